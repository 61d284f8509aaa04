pub mod pipeline;
pub mod texture_source;

pub use pipeline::{PipelineError, RenderContext, RenderPipeline, RenderedImage};
pub use texture_source::{DirTextureSource, MemoryTextureSource, TextureError, TextureSource};
