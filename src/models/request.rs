use swatch_match::{RankQuery, Rgb};

/// A validated request for one strip image.
///
/// Values are range-checked by the API layer before one of these is built;
/// the pipeline trusts them as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Target color
    pub rgb: Rgb,
    /// Game version the blocks must exist in
    pub version: String,
    /// Tiles per page (1-9)
    pub count: usize,
    /// 1-based page number (1-100)
    pub page: usize,
    /// Tile edge in pixels (16-4096, multiple of 16)
    pub height: u32,
    /// Skip the caption strip and labels
    pub no_text: bool,
}

impl RenderRequest {
    pub fn rank_query(&self) -> RankQuery {
        RankQuery::new(self.rgb, self.version.clone(), self.count, self.page)
    }
}
