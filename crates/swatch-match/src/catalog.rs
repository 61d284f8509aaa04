//! The block catalog
//!
//! A catalog is a JSON object whose values describe one block each. Keys are
//! ignored but their order is kept: ranking breaks ties by catalog order, so
//! the same file must always produce the same order.
//!
//! ```json
//! {
//!   "red_wool": {
//!     "display_name": "Red Wool",
//!     "hex": "A12722",
//!     "lab": [35.5, 51.2, 34.1],
//!     "texture_name": "red_wool",
//!     "is_decoration": false,
//!     "show_3d": false,
//!     "versions": ["1.19", "1.20"]
//!   }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::color::{hex_to_lab, Lab};
use crate::error::{CatalogError, ColorError};

/// One renderable block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    /// Human-readable label drawn under the tile
    pub display_name: String,

    /// Average color as 6 hex digits (optional leading `#`)
    #[serde(rename = "hex")]
    pub hex_color: String,

    /// Precomputed Lab value shipped with the data file. Ranking ignores it
    /// and recomputes from `hex_color`.
    #[serde(default)]
    pub lab: Option<[f64; 3]>,

    /// Name of the source image, without extension
    #[serde(rename = "texture_name")]
    pub texture_id: String,

    #[serde(default)]
    pub is_decoration: bool,

    #[serde(default, rename = "show_3d")]
    pub renders_in_3d: bool,

    /// Game versions this block exists in
    #[serde(default, rename = "versions")]
    pub supported_versions: Vec<String>,
}

impl CatalogEntry {
    /// Lab value of `hex_color`.
    pub fn lab(&self) -> Result<Lab, ColorError> {
        hex_to_lab(&self.hex_color)
    }

    /// Whether this entry can be drawn as a flat tile for `version`.
    pub fn is_eligible(&self, version: &str) -> bool {
        !self.is_decoration
            && !self.renders_in_3d
            && self.supported_versions.iter().any(|v| v == version)
    }
}

/// Immutable, ordered collection of catalog entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse the keyed JSON catalog format.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let keyed: IndexMap<String, CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self::new(keyed.into_values().collect()))
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose `hex_color` does not parse. Ranking fails if one of
    /// these survives filtering, so loaders report them up front.
    pub fn invalid_entries(&self) -> Vec<(&CatalogEntry, ColorError)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.lab().err().map(|e| (entry, e)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
