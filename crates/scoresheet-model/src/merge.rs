use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Range;

/// Errors that can occur when merging cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("cannot merge a single cell ({0})")]
    SingleCell(Range),
    #[error("merge {new} overlaps existing merge {existing}")]
    Overlap { new: Range, existing: Range },
}

/// A rectangular block of cells rendered as one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedRegion {
    pub range: Range,
}

/// The merged regions of a worksheet.
///
/// Regions never overlap; [`MergedRegions::add`] enforces this.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedRegions {
    regions: Vec<MergedRegion>,
}

impl MergedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedRegion> {
        self.regions.iter()
    }

    /// Register a new merged region.
    pub fn add(&mut self, range: Range) -> Result<(), MergeError> {
        if range.is_single_cell() {
            return Err(MergeError::SingleCell(range));
        }
        if let Some(existing) = self.regions.iter().find(|r| r.range.intersects(&range)) {
            return Err(MergeError::Overlap {
                new: range,
                existing: existing.range,
            });
        }
        self.regions.push(MergedRegion { range });
        Ok(())
    }

    /// Remove every region touching `range`. Returns the number removed.
    pub fn remove_intersecting(&mut self, range: Range) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| !r.range.intersects(&range));
        before - self.regions.len()
    }

    /// Regions that share at least one cell with `range`.
    pub fn intersecting(&self, range: Range) -> impl Iterator<Item = Range> + '_ {
        self.regions
            .iter()
            .map(|r| r.range)
            .filter(move |r| r.intersects(&range))
    }

    /// The region covering `cell`, if any.
    pub fn containing(&self, cell: crate::CellRef) -> Option<Range> {
        self.regions
            .iter()
            .map(|r| r.range)
            .find(|r| r.contains(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(a1: &str) -> Range {
        Range::from_a1(a1).unwrap()
    }

    #[test]
    fn overlapping_merges_are_rejected() {
        let mut merges = MergedRegions::new();
        merges.add(range("C3:C5")).unwrap();
        let err = merges.add(range("B5:D6")).unwrap_err();
        assert_eq!(
            err,
            MergeError::Overlap {
                new: range("B5:D6"),
                existing: range("C3:C5"),
            }
        );
        assert_eq!(merges.len(), 1);
    }

    #[test]
    fn single_cell_merge_is_rejected() {
        let mut merges = MergedRegions::new();
        assert_eq!(
            merges.add(range("A1")),
            Err(MergeError::SingleCell(range("A1")))
        );
    }

    #[test]
    fn intersecting_filters_to_probe() {
        let mut merges = MergedRegions::new();
        merges.add(range("C3:C5")).unwrap();
        merges.add(range("H1:J1")).unwrap();

        let hits: Vec<Range> = merges.intersecting(range("A5:D9")).collect();
        assert_eq!(hits, vec![range("C3:C5")]);
        assert_eq!(merges.containing(crate::CellRef::new(4, 3)), Some(range("C3:C5")));
        assert_eq!(merges.remove_intersecting(range("I1")), 1);
        assert_eq!(merges.len(), 1);
    }
}
