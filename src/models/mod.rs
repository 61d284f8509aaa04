pub mod config;
pub mod request;

pub use config::{AppConfig, OutputConfig, OutputFormat};
pub use request::RenderRequest;
