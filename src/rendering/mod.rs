pub mod compositor;
pub mod encode;
pub mod labels;

pub use compositor::{TileCompositor, TileGeometry, BACKGROUND};
pub use encode::{encode, EncodedImage};
pub use labels::{Label, LabelPainter};
