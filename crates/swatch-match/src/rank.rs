//! Ranking catalog entries by color distance
//!
//! Ranking is recomputed for every query:
//!
//! 1. the target is converted to Lab once
//! 2. decorations, 3D-only blocks and blocks missing from the requested
//!    version are dropped
//! 3. every survivor's Lab value is computed from its hex color
//! 4. survivors are stable-sorted by ascending CIE76 distance, so entries
//!    at the same distance keep their catalog order
//! 5. the sorted list is cut into pages of `count` entries

use crate::catalog::{Catalog, CatalogEntry};
use crate::color::{delta_e, Rgb};
use crate::error::RankError;

/// Parameters for one ranking.
///
/// `count` and `page` are 1-based and expected to be positive; range checks
/// belong to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankQuery {
    pub target: Rgb,
    pub version: String,
    pub count: usize,
    pub page: usize,
}

impl RankQuery {
    pub fn new(target: Rgb, version: impl Into<String>, count: usize, page: usize) -> Self {
        Self {
            target,
            version: version.into(),
            count,
            page,
        }
    }

    /// Half-open index range of this page, or `None` when it would overflow.
    fn page_bounds(&self) -> Option<(usize, usize)> {
        let start = self.count.checked_mul(self.page.checked_sub(1)?)?;
        let end = start.checked_add(self.count)?;
        Some((start, end))
    }
}

/// One page of ranked entries, closest match first.
///
/// Borrows from the catalog it was ranked against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedPage<'a> {
    entries: Vec<&'a CatalogEntry>,
}

impl<'a> RankedPage<'a> {
    pub fn entries(&self) -> &[&'a CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CatalogEntry> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for RankedPage<'a> {
    type Item = &'a CatalogEntry;
    type IntoIter = std::vec::IntoIter<&'a CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Rank `catalog` against `query` and return the requested page.
///
/// An unknown version, an empty catalog and a page past the end all yield
/// an empty page.
pub fn rank<'a>(catalog: &'a Catalog, query: &RankQuery) -> Result<RankedPage<'a>, RankError> {
    let target = query.target.to_lab();

    let mut scored = Vec::new();
    for entry in catalog.iter().filter(|e| e.is_eligible(&query.version)) {
        let lab = entry.lab().map_err(|source| RankError::InvalidEntryColor {
            entry: entry.display_name.clone(),
            source,
        })?;
        scored.push((delta_e(lab, target), entry));
    }

    // sort_by is stable: equal distances keep catalog order
    scored.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    let entries = match query.page_bounds() {
        Some((start, end)) if start < scored.len() => scored[start..end.min(scored.len())]
            .iter()
            .map(|&(_, entry)| entry)
            .collect(),
        _ => Vec::new(),
    };

    Ok(RankedPage { entries })
}
