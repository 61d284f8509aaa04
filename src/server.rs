//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by the
//! production server, the `render` command and the integration tests.

use axum::{http::header::CONNECTION, routing::get, Router};
use std::sync::Arc;
use swatch_match::Catalog;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::rendering::{LabelPainter, TileCompositor};
use crate::services::{DirTextureSource, RenderContext, RenderPipeline};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<RenderContext>,
    pub pipeline: Arc<RenderPipeline>,
}

/// Load the catalog and build the render pipeline described by `config`.
///
/// Fails if the catalog cannot be read. Entries with unparseable colors
/// are logged but kept; a request that ranks them fails with a server error.
pub fn create_render_services(
    config: &AppConfig,
    asset_loader: &AssetLoader,
) -> anyhow::Result<(RenderContext, RenderPipeline)> {
    let catalog = Catalog::load(&config.catalog).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load block catalog {}: {e}",
            config.catalog.display()
        )
    })?;

    for (entry, error) in catalog.invalid_entries() {
        tracing::warn!(
            block = %entry.display_name,
            %error,
            "Catalog entry has an invalid color"
        );
    }
    tracing::info!(
        blocks = catalog.len(),
        path = %config.catalog.display(),
        "Loaded block catalog"
    );

    if !config.images_dir.is_dir() {
        tracing::warn!(
            dir = %config.images_dir.display(),
            "Texture directory does not exist, every render will fail"
        );
    }

    let textures = Arc::new(DirTextureSource::new(&config.images_dir));
    let labels = Arc::new(LabelPainter::with_fonts(
        asset_loader.get_fonts(),
        config.label_font.clone(),
    ));
    let compositor = TileCompositor::new(textures, labels, config.output);

    let context = RenderContext::new(Arc::new(catalog), config.allowed_versions.clone());
    Ok((context, RenderPipeline::new(compositor)))
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: &AppConfig, asset_loader: &AssetLoader) -> anyhow::Result<AppState> {
    let (context, pipeline) = create_render_services(config, asset_loader)?;

    Ok(AppState {
        context: Arc::new(context),
        pipeline: Arc::new(pipeline),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Every response carries `Connection: close`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/getBlockImage", get(handle_block_image))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CONNECTION,
            axum::http::HeaderValue::from_static("close"),
        ))
}

// Wrapper handler to extract state components for the underlying API handler

async fn handle_block_image(
    axum::extract::State(state): axum::extract::State<AppState>,
    query: axum::extract::Query<Vec<(String, String)>>,
) -> Result<axum::response::Response, ApiError> {
    api::handle_block_image(
        axum::extract::State(state.context),
        axum::extract::State(state.pipeline),
        query,
    )
    .await
}
