use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing Parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid Parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("Invalid Format: {0}")]
    InvalidFormat(&'static str),

    #[error("Server Error: Image processing failed")]
    Pipeline(#[from] PipelineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Source image unavailable for texture {texture_id:?}: {reason}")]
    SourceImageUnavailable { texture_id: String, reason: String },

    #[error("Invalid tile height: {0} (must be a positive multiple of 16)")]
    InvalidTileHeight(u32),

    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("Label render error: {0}")]
    Label(String),

    #[error("Image encode error: {0}")]
    Encode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter(_)
            | ApiError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_missing_parameter() {
        let error = ApiError::MissingParameter("version");
        assert_eq!(error.to_string(), "Missing Parameter: version");
    }

    #[test]
    fn test_api_error_invalid_parameter() {
        let error = ApiError::InvalidParameter("version");
        assert_eq!(error.to_string(), "Invalid Parameter: version");
    }

    #[test]
    fn test_api_error_invalid_format() {
        let error = ApiError::InvalidFormat("page must be a valid integer in the range 1-100");
        assert_eq!(
            error.to_string(),
            "Invalid Format: page must be a valid integer in the range 1-100"
        );
    }

    #[test]
    fn test_api_error_pipeline_hides_details() {
        let error = ApiError::Pipeline(PipelineError::Render(
            RenderError::SourceImageUnavailable {
                texture_id: "secret_texture".to_string(),
                reason: "not found".to_string(),
            },
        ));
        assert_eq!(error.to_string(), "Server Error: Image processing failed");
    }

    #[test]
    fn test_render_error_source_image_unavailable() {
        let error = RenderError::SourceImageUnavailable {
            texture_id: "red_wool".to_string(),
            reason: "file not found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Source image unavailable for texture \"red_wool\": file not found"
        );
    }

    #[test]
    fn test_render_error_invalid_tile_height() {
        let error = RenderError::InvalidTileHeight(20);
        assert_eq!(
            error.to_string(),
            "Invalid tile height: 20 (must be a positive multiple of 16)"
        );
    }

    #[test]
    fn test_render_error_pixmap_allocation() {
        let error = RenderError::PixmapAllocation {
            width: 0,
            height: 16,
        };
        assert_eq!(error.to_string(), "Failed to allocate 0x16 pixmap");
    }

    #[test]
    fn test_api_error_from_pipeline_error() {
        let pipeline_error = PipelineError::Render(RenderError::InvalidTileHeight(0));
        let api_error: ApiError = pipeline_error.into();
        match api_error {
            ApiError::Pipeline(_) => {}
            _ => panic!("Expected Pipeline variant"),
        }
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        use axum::response::IntoResponse;

        // MissingParameter -> BAD_REQUEST
        let response = ApiError::MissingParameter("rgb").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // InvalidParameter -> BAD_REQUEST
        let response = ApiError::InvalidParameter("version").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // InvalidFormat -> BAD_REQUEST
        let response = ApiError::InvalidFormat("count").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Pipeline -> INTERNAL_SERVER_ERROR
        let response =
            ApiError::Pipeline(PipelineError::Render(RenderError::InvalidTileHeight(0)))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Internal -> INTERNAL_SERVER_ERROR
        let response = ApiError::Internal("error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
