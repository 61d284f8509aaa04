//! swatch-match: perceptual color matching for block catalogs
//!
//! This crate holds everything needed to answer "which catalog entries look
//! most like this color?" without touching pixels:
//!
//! - [`color`]: sRGB ↔ hex ↔ CIE L\*a\*b\* conversion and the CIE76
//!   [`delta_e`] distance
//! - [`catalog`]: the immutable [`Catalog`] of [`CatalogEntry`] records and
//!   its JSON loader
//! - [`rank`]: eligibility filtering, stable distance ordering and pagination
//!
//! # Quick Start
//!
//! ```
//! use swatch_match::{rank, Catalog, RankQuery, Rgb};
//!
//! let json = r##"{
//!     "red_wool":  {"display_name": "Red Wool",  "hex": "FF0000", "texture_name": "red_wool",  "versions": ["1.20"]},
//!     "blue_wool": {"display_name": "Blue Wool", "hex": "0000FF", "texture_name": "blue_wool", "versions": ["1.20"]}
//! }"##;
//! let catalog = Catalog::from_json_str(json).unwrap();
//!
//! let query = RankQuery::new(Rgb::new(250, 10, 10), "1.20", 2, 1);
//! let page = rank(&catalog, &query).unwrap();
//!
//! let names: Vec<_> = page.iter().map(|e| e.display_name.as_str()).collect();
//! assert_eq!(names, ["Red Wool", "Blue Wool"]);
//! ```
//!
//! # Color Science
//!
//! Ranking uses the classic CIE76 difference: Euclidean distance in
//! L\*a\*b\* computed with the D65 white point and 2° observer. The exact
//! constants are part of the contract. Two deployments given the same
//! catalog and target must produce the same order, including ties, so the
//! conversion is hand-written rather than delegated to a color library
//! with its own matrices.

pub mod catalog;
pub mod color;
pub mod error;
pub mod rank;

pub use catalog::{Catalog, CatalogEntry};
pub use color::{delta_e, hex_to_lab, hex_to_rgb, rgb_to_lab, Lab, Rgb};
pub use error::{CatalogError, ColorError, RankError};
pub use rank::{rank, RankQuery, RankedPage};
