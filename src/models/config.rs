use crate::assets::AssetLoader;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Port to listen on when BIND_ADDR is not set
    #[serde(default = "default_port")]
    pub port: u16,

    /// Versions accepted by the `version` query parameter
    #[serde(default)]
    pub allowed_versions: Vec<String>,

    /// Path to the block catalog (JSON)
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Directory holding `{texture_name}.png` source images
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Font family used for tile labels
    #[serde(default = "default_label_font")]
    pub label_font: String,

    /// Encoded output settings
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_port() -> u16 {
    8080
}

fn default_catalog() -> PathBuf {
    PathBuf::from("blocks/data.json")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("blocks/images")
}

fn default_label_font() -> String {
    "Minecraftia".to_string()
}

/// Image format of rendered strips
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Output encoding configuration
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// JPEG quality, 1-100 (ignored for PNG)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_quality() -> u8 {
    75
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: default_quality(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        allowed_versions = config.allowed_versions.len(),
                        catalog = %config.catalog.display(),
                        images_dir = %config.images_dir.display(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Listen address derived from `port`
    pub fn default_bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_versions: Vec::new(),
            catalog: default_catalog(),
            images_dir: default_images_dir(),
            label_font: default_label_font(),
            output: OutputConfig::default(),
        }
    }
}
