//! blockswatch - block palettes for a color
//!
//! HTTP service that ranks Minecraft blocks by perceptual distance to a
//! color and renders the best matches as one labeled image strip.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
