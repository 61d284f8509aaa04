//! Rank → composite → encode
//!
//! The pipeline is synchronous and does no validation; the API and CLI
//! layers check request ranges before calling it. Everything shared between
//! calls lives in a [`RenderContext`] that is passed in explicitly.

use std::sync::Arc;

use swatch_match::{rank, Catalog, RankError};

use crate::error::RenderError;
use crate::models::RenderRequest;
use crate::rendering::{EncodedImage, TileCompositor};

/// Error from the render pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Rank error: {0}")]
    Rank(#[from] RankError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Immutable state shared by every render call.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub catalog: Arc<Catalog>,
    pub allowed_versions: Vec<String>,
}

impl RenderContext {
    pub fn new(catalog: Arc<Catalog>, allowed_versions: Vec<String>) -> Self {
        Self {
            catalog,
            allowed_versions,
        }
    }

    pub fn is_allowed_version(&self, version: &str) -> bool {
        self.allowed_versions.iter().any(|v| v == version)
    }
}

/// Result of a successful render
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub image: EncodedImage,
    /// Number of blocks drawn (0 for a past-the-end page)
    pub tiles: usize,
}

impl RenderedImage {
    pub fn content_type(&self) -> &'static str {
        self.image.content_type()
    }
}

/// Produces strip images for validated requests
pub struct RenderPipeline {
    compositor: TileCompositor,
}

impl RenderPipeline {
    pub fn new(compositor: TileCompositor) -> Self {
        Self { compositor }
    }

    /// Rank the catalog for `request` and render the selected page.
    pub fn render(
        &self,
        ctx: &RenderContext,
        request: &RenderRequest,
    ) -> Result<RenderedImage, PipelineError> {
        let page = rank(&ctx.catalog, &request.rank_query())?;
        let image = self
            .compositor
            .render(page.entries(), request.height, !request.no_text)?;

        Ok(RenderedImage {
            image,
            tiles: page.len(),
        })
    }
}
