use std::sync::Arc;

use swatch_match::CatalogEntry;
use tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::encode::{encode, EncodedImage};
use super::labels::{Label, LabelPainter};
use crate::error::RenderError;
use crate::models::OutputConfig;
use crate::services::TextureSource;

/// Backdrop behind transparent textures
pub const BACKGROUND: (u8, u8, u8) = (110, 101, 91);

/// Opacity of the white caption strip
const CAPTION_ALPHA: u8 = 150;

/// Pixel layout of a strip with square tile slots.
///
/// All offsets are fractions of the tile height (1/16, 1/32, 1/64, 1/128),
/// which stay integral because the height is a multiple of 16. Below 128
/// the smallest fractions round down to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    pub tile_height: u32,
}

impl TileGeometry {
    pub fn new(tile_height: u32) -> Result<Self, RenderError> {
        if tile_height == 0 || tile_height % 16 != 0 {
            return Err(RenderError::InvalidTileHeight(tile_height));
        }
        Ok(Self { tile_height })
    }

    /// Canvas width for `tiles` slots.
    pub fn canvas_width(&self, tiles: usize) -> Option<u32> {
        u32::try_from(tiles).ok()?.checked_mul(self.tile_height)
    }

    pub fn tile_x(&self, index: usize) -> u32 {
        self.tile_height * index as u32
    }

    pub fn caption_height(&self) -> u32 {
        self.tile_height / 16
    }

    pub fn caption_y(&self) -> u32 {
        self.tile_height - self.caption_height()
    }

    /// Label box for tile `index` as (x, y, width, height).
    pub fn label_box(&self, index: usize) -> (u32, u32, u32, u32) {
        let h = self.tile_height;
        (
            self.tile_x(index) + h / 32,
            self.caption_y() + h / 128,
            h - h / 16,
            h / 16 - h / 64,
        )
    }
}

/// Composites block textures into one horizontal strip.
pub struct TileCompositor {
    textures: Arc<dyn TextureSource>,
    labels: Arc<LabelPainter>,
    output: OutputConfig,
}

impl TileCompositor {
    pub fn new(
        textures: Arc<dyn TextureSource>,
        labels: Arc<LabelPainter>,
        output: OutputConfig,
    ) -> Self {
        Self {
            textures,
            labels,
            output,
        }
    }

    /// Render `entries` left to right and encode the result.
    ///
    /// An empty slice renders a single empty background tile.
    pub fn render(
        &self,
        entries: &[&CatalogEntry],
        tile_height: u32,
        include_labels: bool,
    ) -> Result<EncodedImage, RenderError> {
        let canvas = self.compose(entries, tile_height, include_labels)?;
        encode(&canvas, &self.output)
    }

    /// Build the strip canvas without encoding it.
    pub fn compose(
        &self,
        entries: &[&CatalogEntry],
        tile_height: u32,
        include_labels: bool,
    ) -> Result<Pixmap, RenderError> {
        let geometry = TileGeometry::new(tile_height)?;

        if entries.is_empty() {
            return new_canvas(tile_height, tile_height);
        }

        let width = geometry
            .canvas_width(entries.len())
            .ok_or(RenderError::PixmapAllocation {
                width: u32::MAX,
                height: tile_height,
            })?;
        let mut canvas = new_canvas(width, tile_height)?;

        for (index, entry) in entries.iter().enumerate() {
            self.draw_tile(&mut canvas, &geometry, index, entry)?;
        }

        if include_labels {
            // The canvas starts opaque and neither blend mode lowers alpha,
            // so the strip needs no separate flattening pass.
            draw_caption_strip(&mut canvas, &geometry)?;

            let labels: Vec<Label<'_>> = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let (x, y, width, height) = geometry.label_box(index);
                    Label {
                        text: &entry.display_name,
                        x,
                        y,
                        width,
                        height,
                    }
                })
                .collect();
            self.labels.paint(&mut canvas, &labels)?;
        }

        Ok(canvas)
    }

    /// Scale one texture to the tile height and draw it into its slot.
    fn draw_tile(
        &self,
        canvas: &mut Pixmap,
        geometry: &TileGeometry,
        index: usize,
        entry: &CatalogEntry,
    ) -> Result<(), RenderError> {
        // Dropped at the end of this call, before the next tile is loaded
        let source = self.textures.load(&entry.texture_id).map_err(|e| {
            RenderError::SourceImageUnavailable {
                texture_id: entry.texture_id.clone(),
                reason: e.to_string(),
            }
        })?;

        let scale = geometry.tile_height as f32 / source.height() as f32;
        let transform =
            Transform::from_scale(scale, scale).post_translate(geometry.tile_x(index) as f32, 0.0);
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Nearest,
        };

        canvas.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
        Ok(())
    }
}

/// Opaque canvas filled with the background color.
fn new_canvas(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    let mut canvas = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;
    let (r, g, b) = BACKGROUND;
    canvas.fill(Color::from_rgba8(r, g, b, 255));
    Ok(canvas)
}

/// Lighten the bottom of the canvas with a translucent white band.
fn draw_caption_strip(canvas: &mut Pixmap, geometry: &TileGeometry) -> Result<(), RenderError> {
    let width = canvas.width();
    let height = geometry.caption_height();
    let mut strip = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;
    strip.fill(Color::from_rgba8(255, 255, 255, CAPTION_ALPHA));

    let paint = PixmapPaint {
        blend_mode: BlendMode::Plus,
        ..Default::default()
    };
    canvas.draw_pixmap(
        0,
        geometry.caption_y() as i32,
        strip.as_ref(),
        &paint,
        Transform::identity(),
        None,
    );
    Ok(())
}
