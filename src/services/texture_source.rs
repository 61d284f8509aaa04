//! Source texture lookup
//!
//! The compositor only needs "give me the decoded image for this texture
//! name". [`DirTextureSource`] serves `{dir}/{texture_id}.png` files;
//! [`MemoryTextureSource`] holds pixmaps directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("invalid texture name")]
    InvalidId,

    #[error("texture not found")]
    NotFound,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Provides decoded RGBA source images by texture name.
pub trait TextureSource: Send + Sync {
    /// Load and decode the texture. Each call returns a fresh pixmap owned
    /// by the caller.
    fn load(&self, texture_id: &str) -> Result<Pixmap, TextureError>;
}

/// Loads `{texture_id}.png` from a directory.
pub struct DirTextureSource {
    dir: PathBuf,
}

impl DirTextureSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

/// Texture names come from catalog data; keep them inside the image directory.
fn is_plain_name(texture_id: &str) -> bool {
    !texture_id.is_empty()
        && texture_id != "."
        && texture_id != ".."
        && !texture_id.contains(['/', '\\', '\0'])
}

impl TextureSource for DirTextureSource {
    fn load(&self, texture_id: &str) -> Result<Pixmap, TextureError> {
        if !is_plain_name(texture_id) {
            return Err(TextureError::InvalidId);
        }

        let path = self.dir.join(format!("{texture_id}.png"));
        let data = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TextureError::NotFound
            } else {
                TextureError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        Pixmap::decode_png(&data).map_err(|e| TextureError::Decode {
            path,
            reason: e.to_string(),
        })
    }
}

/// In-memory textures, cloned out on every load.
#[derive(Default)]
pub struct MemoryTextureSource {
    textures: HashMap<String, Pixmap>,
}

impl MemoryTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture_id: impl Into<String>, pixmap: Pixmap) {
        self.textures.insert(texture_id.into(), pixmap);
    }

    pub fn with(mut self, texture_id: impl Into<String>, pixmap: Pixmap) -> Self {
        self.insert(texture_id, pixmap);
        self
    }
}

impl TextureSource for MemoryTextureSource {
    fn load(&self, texture_id: &str) -> Result<Pixmap, TextureError> {
        self.textures
            .get(texture_id)
            .cloned()
            .ok_or(TextureError::NotFound)
    }
}
