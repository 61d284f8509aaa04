use std::fmt::Write as _;
use std::sync::Arc;

use resvg::usvg::{self, Transform};
use tiny_skia::Pixmap;

use crate::error::RenderError;

/// Average glyph advance of a pixel font, as a fraction of the font size.
const ADVANCE_PER_EM: f32 = 0.65;

/// Generic family named after the configured one in every label.
const FALLBACK_FAMILY: &str = "monospace";

/// A label to draw, centered in a box given in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Label<'a> {
    pub text: &'a str,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Draws tile labels through an SVG text layer.
pub struct LabelPainter {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
    font_family: String,
    /// Family that labels actually render with, if any face is installed
    resolved_family: Option<String>,
}

impl LabelPainter {
    /// Create a painter with fonts loaded from the provided data, falling
    /// back to system fonts.
    pub fn with_fonts(
        fonts: Vec<(String, std::borrow::Cow<'static, [u8]>)>,
        font_family: impl Into<String>,
    ) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data.into_owned());
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        // fontdb maps `monospace` to Courier New unless told otherwise
        let fallback = fallback_family(&fontdb);
        if let Some(ref family) = fallback {
            fontdb.set_monospace_family(family.clone());
            fontdb.set_sans_serif_family(family.clone());
        }

        let font_family = font_family.into();
        let has_family = fontdb
            .faces()
            .any(|f| f.families.iter().any(|(name, _)| *name == font_family));
        let resolved_family = if has_family {
            tracing::info!(
                font_count = fontdb.len(),
                family = %font_family,
                "Loaded fonts for label rendering"
            );
            Some(font_family.clone())
        } else {
            match fallback {
                Some(ref fallback) => tracing::warn!(
                    family = %font_family,
                    %fallback,
                    "Label font not found, using fallback"
                ),
                None => tracing::warn!(
                    family = %font_family,
                    "No fonts installed, labels will not be drawn"
                ),
            }
            fallback
        };

        Self {
            fontdb: Arc::new(fontdb),
            font_family,
            resolved_family,
        }
    }

    /// Create a painter with system fonts only
    pub fn new(font_family: impl Into<String>) -> Self {
        Self::with_fonts(Vec::new(), font_family)
    }

    /// The configured family when installed, otherwise the fallback that
    /// stands in for `monospace`. `None` when no face is available at all.
    pub fn resolved_family(&self) -> Option<&str> {
        self.resolved_family.as_deref()
    }

    /// Draw black, centered labels onto `canvas`.
    pub fn paint(&self, canvas: &mut Pixmap, labels: &[Label<'_>]) -> Result<(), RenderError> {
        if labels.is_empty() {
            return Ok(());
        }

        let svg = build_label_svg(canvas.width(), canvas.height(), &self.font_family, labels);
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
            .map_err(|e| RenderError::Label(e.to_string()))?;

        resvg::render(&tree, Transform::identity(), &mut canvas.as_mut());
        Ok(())
    }
}

/// Upright monospaced faces first, then any upright face, then anything;
/// ties broken by name so the choice does not depend on directory order.
fn fallback_family(fontdb: &fontdb::Database) -> Option<String> {
    fontdb
        .faces()
        .filter_map(|face| {
            let (name, _) = face.families.first()?;
            Some((!face.monospaced, face.style != fontdb::Style::Normal, name))
        })
        .min()
        .map(|(_, _, name)| name.clone())
}

/// Font size that fills the box height, shrunk when the estimated text
/// advance would overflow the box width.
fn fit_font_size(text: &str, width: u32, height: u32) -> f32 {
    let chars = text.chars().count().max(1) as f32;
    let by_width = width as f32 / (chars * ADVANCE_PER_EM);
    (height as f32).min(by_width)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn build_label_svg(width: u32, height: u32, font_family: &str, labels: &[Label<'_>]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let family = escape_xml(font_family);

    for label in labels {
        let cx = label.x as f32 + label.width as f32 / 2.0;
        let cy = label.y as f32 + label.height as f32 / 2.0;
        let size = fit_font_size(label.text, label.width, label.height);
        // writing to a String cannot fail
        let _ = write!(
            svg,
            r##"<text x="{cx}" y="{cy}" font-family="'{family}', {FALLBACK_FAMILY}" font-size="{size}" fill="#000000" text-anchor="middle" dominant-baseline="central" text-rendering="optimizeSpeed">{}</text>"##,
            escape_xml(label.text)
        );
    }

    svg.push_str("</svg>");
    svg
}
