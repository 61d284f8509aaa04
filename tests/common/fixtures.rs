//! Test fixtures: a small block catalog with generated textures on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tiny_skia::{Color, Pixmap};

use blockswatch::models::{AppConfig, OutputConfig};

/// Versions accepted by fixture configs
pub const VERSIONS: [&str; 3] = ["1.19", "1.20", "1.21"];

/// One fixture block
pub struct Block {
    pub key: &'static str,
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
    pub versions: &'static [&'static str],
    pub is_decoration: bool,
    pub show_3d: bool,
}

const fn block(
    key: &'static str,
    name: &'static str,
    hex: &'static str,
    rgb: (u8, u8, u8),
    versions: &'static [&'static str],
) -> Block {
    Block {
        key,
        name,
        hex,
        rgb,
        versions,
        is_decoration: false,
        show_3d: false,
    }
}

/// Catalog contents
pub const BLOCKS: &[Block] = &[
    block("red_wool", "Red Wool", "A12722", (161, 39, 34), &["1.19", "1.20", "1.21"]),
    block("blue_wool", "Blue Wool", "35399D", (53, 57, 157), &["1.19", "1.20", "1.21"]),
    block("green_wool", "Green Wool", "546D1B", (84, 109, 27), &["1.20", "1.21"]),
    block("white_wool", "White Wool", "E9ECEC", (233, 236, 236), &["1.20", "1.21"]),
    block("black_wool", "Black Wool", "141519", (20, 21, 25), &["1.20", "1.21"]),
    block("orange_wool", "Orange Wool", "F07613", (240, 118, 19), &["1.20", "1.21"]),
    block("yellow_wool", "Yellow Wool", "F8C527", (248, 197, 39), &["1.20", "1.21"]),
    // Filtered out: only in a later version
    block("pale_oak_planks", "Pale Oak Planks", "E3D6D5", (227, 214, 213), &["1.21"]),
    Block {
        is_decoration: true,
        ..block("red_banner", "Red Banner", "A12722", (161, 39, 34), &["1.19", "1.20", "1.21"])
    },
    Block {
        show_3d: true,
        ..block("red_bed", "Red Bed", "A12722", (161, 39, 34), &["1.19", "1.20", "1.21"])
    },
];

pub fn find(key: &str) -> &'static Block {
    BLOCKS
        .iter()
        .find(|b| b.key == key)
        .unwrap_or_else(|| panic!("no fixture block {key}"))
}

/// Catalog JSON for `blocks`
pub fn catalog_json(blocks: &[Block]) -> String {
    let mut map = serde_json::Map::new();
    for b in blocks {
        map.insert(
            b.key.to_string(),
            serde_json::json!({
                "display_name": b.name,
                "hex": b.hex,
                "lab": [0.0, 0.0, 0.0],
                "texture_name": b.key,
                "is_decoration": b.is_decoration,
                "show_3d": b.show_3d,
                "versions": b.versions,
            }),
        );
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(map)).unwrap()
}

/// A solid-color 16x16 texture
pub fn solid_texture(rgb: (u8, u8, u8)) -> Pixmap {
    let mut pixmap = Pixmap::new(16, 16).unwrap();
    pixmap.fill(Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255));
    pixmap
}

/// Catalog and textures written into a temporary directory
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Write the full catalog with a texture for every block
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir_all(&images).unwrap();

        std::fs::write(dir.path().join("data.json"), catalog_json(BLOCKS)).unwrap();
        for b in BLOCKS {
            let png = solid_texture(b.rgb).encode_png().unwrap();
            std::fs::write(images.join(format!("{}.png", b.key)), png).unwrap();
        }

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    /// Delete a block's texture so rendering it fails
    pub fn remove_texture(&self, key: &str) {
        std::fs::remove_file(self.images_dir().join(format!("{key}.png"))).unwrap();
    }

    /// Config pointing at this fixture
    pub fn config(&self) -> AppConfig {
        AppConfig {
            allowed_versions: VERSIONS.iter().map(|v| v.to_string()).collect(),
            catalog: self.catalog_path(),
            images_dir: self.images_dir(),
            output: OutputConfig::default(),
            ..Default::default()
        }
    }

    /// Write a YAML config file for this fixture and return its path
    pub fn write_config_yaml(&self, output_format: &str) -> PathBuf {
        let path = self.dir.path().join("config.yaml");
        let yaml = format!(
            "port: 0\nallowed_versions: [\"1.20\"]\ncatalog: {}\nimages_dir: {}\noutput:\n  format: {output_format}\n",
            self.catalog_path().display(),
            self.images_dir().display(),
        );
        std::fs::write(&path, yaml).unwrap();
        path
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a /getBlockImage path from query pairs
pub fn block_image_path(params: &[(&str, &str)]) -> String {
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("/getBlockImage?{}", query.join("&"))
}

/// A complete, valid parameter set
pub fn valid_params() -> Vec<(&'static str, &'static str)> {
    vec![
        ("version", "1.20"),
        ("rgb", "250,10,10"),
        ("count", "3"),
        ("height", "64"),
        ("page", "1"),
    ]
}

/// `valid_params` with one parameter replaced (or removed when `value` is None)
pub fn params_with(
    name: &'static str,
    value: Option<&'static str>,
) -> Vec<(&'static str, &'static str)> {
    let mut params: Vec<_> = valid_params().into_iter().filter(|(k, _)| *k != name).collect();
    if let Some(v) = value {
        params.push((name, v));
    }
    params
}
