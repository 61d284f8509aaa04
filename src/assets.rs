//! Asset loading with embedded fallbacks
//!
//! - Config: if `CONFIG_FILE` is set and the file exists it is used,
//!   otherwise the `config.yaml` compiled into the binary.
//! - Fonts: every `.ttf`/`.otf`/`.woff`/`.woff2` in `FONTS_DIR`. System
//!   fonts are added later by the label painter as a fallback.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

/// Asset loader with optional filesystem overrides
pub struct AssetLoader {
    /// External fonts directory (from FONTS_DIR env var)
    fonts_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(fonts_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            config_file,
        }
    }

    /// Create a loader from `FONTS_DIR` and `CONFIG_FILE`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("FONTS_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    /// Which config [`read_config`](Self::read_config) will return
    pub fn config_source(&self) -> ConfigSource {
        match self.config_file {
            Some(ref path) if path.exists() => ConfigSource::File(path.clone()),
            _ => ConfigSource::Embedded,
        }
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let ConfigSource::File(path) = self.config_source() {
            tracing::trace!(path = %path.display(), "Loading config from filesystem");
            return Ok(Cow::Owned(fs::read(path)?));
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Get all font data from the fonts directory (for loading into fontdb)
    pub fn get_fonts(&self) -> Vec<(String, Cow<'static, [u8]>)> {
        let Some(ref dir) = self.fonts_dir else {
            return Vec::new();
        };

        let Ok(entries) = fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "Fonts directory not readable");
            return Vec::new();
        };

        let mut fonts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_font_file(&path) {
                continue;
            }
            match fs::read(&path) {
                Ok(data) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    tracing::trace!(font = %name, "Loading font from filesystem");
                    fonts.push((name, Cow::Owned(data)));
                }
                Err(e) => tracing::warn!(path = %path.display(), %e, "Failed to read font"),
            }
        }

        fonts.sort_by(|a, b| a.0.cmp(&b.0));
        fonts
    }
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ttf" | "otf" | "woff" | "woff2")
    )
}
