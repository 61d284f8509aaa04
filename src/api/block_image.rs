use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use swatch_match::Rgb;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::RenderRequest;
use crate::services::{RenderContext, RenderPipeline};

const MIN_COUNT: i64 = 1;
const MAX_COUNT: i64 = 9;
const MIN_HEIGHT: i64 = 16;
const MAX_HEIGHT: i64 = 4096;
const MIN_PAGE: i64 = 1;
const MAX_PAGE: i64 = 100;

const RGB_FORMAT: &str = "rgb must be an integer comma seperated list of 3 8 bit integers";
const COUNT_FORMAT: &str = "count must be a valid integer in range 1-9";
const HEIGHT_FORMAT: &str =
    "height must be a valid integer in the range 16-4096 that is a multiple of 16";
const PAGE_FORMAT: &str = "page must be a valid integer in the range 1-100";

/// Raw query parameters for /getBlockImage
///
/// Everything arrives as text so that missing and malformed values can be
/// told apart. An empty value counts as missing.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlockImageQuery {
    /// Game version, must be one of the configured versions
    pub version: Option<String>,
    /// Target color as `r,g,b` (each 0-255)
    pub rgb: Option<String>,
    /// Blocks per page (1-9)
    pub count: Option<String>,
    /// Tile height in pixels (16-4096, multiple of 16)
    pub height: Option<String>,
    /// 1-based page number (1-100)
    pub page: Option<String>,
    /// Any non-empty value disables labels
    #[serde(rename = "noText")]
    pub no_text: Option<String>,
}

/// Returns the value only if present and non-empty
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse a decimal integer (optional sign) within `min..=max`.
fn parse_in_range(value: &str, min: i64, max: i64) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| (min..=max).contains(n))
}

fn parse_rgb(value: &str) -> Option<Rgb> {
    let parts: Vec<&str> = value.split(',').collect();
    let [r, g, b] = parts.as_slice() else {
        return None;
    };
    let channel = |s: &str| parse_in_range(s, 0, 255).map(|n| n as u8);
    Some(Rgb::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

impl BlockImageQuery {
    /// Collect parameters from raw query pairs. A repeated key keeps its
    /// first value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "version" => &mut query.version,
                "rgb" => &mut query.rgb,
                "count" => &mut query.count,
                "height" => &mut query.height,
                "page" => &mut query.page,
                "noText" => &mut query.no_text,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Check parameters in a fixed order and stop at the first problem.
    pub fn validate(&self, context: &RenderContext) -> Result<RenderRequest, ApiError> {
        let version = present(&self.version).ok_or(ApiError::MissingParameter("version"))?;
        if !context.is_allowed_version(version) {
            return Err(ApiError::InvalidParameter("version"));
        }

        let rgb = present(&self.rgb).ok_or(ApiError::MissingParameter("rgb"))?;
        let rgb = parse_rgb(rgb).ok_or(ApiError::InvalidFormat(RGB_FORMAT))?;

        let count = present(&self.count).ok_or(ApiError::MissingParameter("count"))?;
        let count = parse_in_range(count, MIN_COUNT, MAX_COUNT)
            .ok_or(ApiError::InvalidFormat(COUNT_FORMAT))?;

        let height = present(&self.height).ok_or(ApiError::MissingParameter("height"))?;
        let height = parse_in_range(height, MIN_HEIGHT, MAX_HEIGHT)
            .filter(|h| h % 16 == 0)
            .ok_or(ApiError::InvalidFormat(HEIGHT_FORMAT))?;

        let page = present(&self.page).ok_or(ApiError::MissingParameter("page"))?;
        let page = parse_in_range(page, MIN_PAGE, MAX_PAGE)
            .ok_or(ApiError::InvalidFormat(PAGE_FORMAT))?;

        Ok(RenderRequest {
            rgb,
            version: version.to_string(),
            count: count as usize,
            page: page as usize,
            height: height as u32,
            no_text: present(&self.no_text).is_some(),
        })
    }
}

/// Render the closest-matching blocks for a color
///
/// Blocks are ranked by CIE76 distance to `rgb`, restricted to flat,
/// non-decorative blocks available in `version`, and the requested page is
/// returned as one horizontal strip. A page past the end of the ranking
/// yields a single empty tile.
#[utoipa::path(
    get,
    path = "/getBlockImage",
    params(BlockImageQuery),
    responses(
        (status = 200, description = "Strip image", content_type = "image/jpeg"),
        (status = 400, description = "Missing or malformed parameter"),
        (status = 500, description = "Image processing failed"),
    ),
    tag = "Blocks"
)]
pub async fn handle_block_image(
    State(context): State<Arc<RenderContext>>,
    State(pipeline): State<Arc<RenderPipeline>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = BlockImageQuery::from_pairs(pairs);
    let request = query.validate(&context).map_err(|e| {
        tracing::debug!(error = %e, "Rejected block image request");
        e
    })?;

    tracing::info!(
        rgb = %request.rgb,
        version = %request.version,
        count = request.count,
        page = request.page,
        height = request.height,
        no_text = request.no_text,
        "Block image request received"
    );

    // Compositing and encoding are CPU-bound
    let task_request = request.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.render(&context, &task_request))
        .await
        .map_err(|e| ApiError::Internal(format!("Task error: {e}")))?;

    let rendered = result.map_err(|e| {
        tracing::error!(
            error = %e,
            rgb = %request.rgb,
            version = %request.version,
            page = request.page,
            "Failed to render block image"
        );
        ApiError::from(e)
    })?;

    tracing::info!(
        tiles = rendered.tiles,
        size_bytes = rendered.image.bytes.len(),
        "Block image rendered successfully"
    );

    let content_type = rendered.content_type();
    let bytes = rendered.image.bytes;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}
