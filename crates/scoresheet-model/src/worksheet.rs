use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    A1ParseError, CellRef, CellValue, FindOptions, MergeError, MergedRegions, Range,
    RangeParseError,
};

/// A stored cell: its value and, optionally, the formula that produces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Formula text in display form (leading `=`).
    pub formula: Option<String>,
}

impl Cell {
    fn is_vacant(&self) -> bool {
        self.value.is_blank() && self.formula.is_none()
    }
}

/// A single worksheet: sparse cells plus merged regions.
///
/// Cells are keyed by [`CellRef`], whose ordering is row-major, so iteration and
/// search results come back top-to-bottom, left-to-right.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorksheetSnapshot", into = "WorksheetSnapshot")]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<CellRef, Cell>,
    merges: MergedRegions,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            merges: MergedRegions::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored (non-vacant) cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate stored cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    /// The value shown at `cell`. Cells inside a merge show the merge's anchor value.
    pub fn value(&self, cell: CellRef) -> CellValue {
        let cell = self.anchor_of(cell);
        self.cells
            .get(&cell)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Formula stored at `cell`, if any.
    pub fn formula(&self, cell: CellRef) -> Option<&str> {
        self.cells
            .get(&self.anchor_of(cell))
            .and_then(|c| c.formula.as_deref())
    }

    /// Set a value. Writing anywhere inside a merge writes the anchor cell.
    pub fn set_value(&mut self, cell: CellRef, value: impl Into<CellValue>) {
        let cell = self.anchor_of(cell);
        let value = value.into();
        let entry = self.cells.entry(cell).or_default();
        entry.value = value;
        entry.formula = None;
        if entry.is_vacant() {
            self.cells.remove(&cell);
        }
    }

    /// Set the formula at `cell`, clearing any cached value.
    pub fn set_formula(&mut self, cell: CellRef, formula: impl Into<String>) {
        let cell = self.anchor_of(cell);
        let formula = formula.into();
        if formula.trim().is_empty() {
            if let Some(entry) = self.cells.get_mut(&cell) {
                entry.formula = None;
                if entry.is_vacant() {
                    self.cells.remove(&cell);
                }
            }
            return;
        }
        let entry = self.cells.entry(cell).or_default();
        entry.value = CellValue::Empty;
        entry.formula = Some(formula);
    }

    /// Remove the value and formula at `cell`. Inside a merge this clears the anchor.
    pub fn clear_cell(&mut self, cell: CellRef) {
        let cell = self.anchor_of(cell);
        self.cells.remove(&cell);
    }

    /// Merge `range` into a single cell. Only the top-left value survives.
    pub fn merge_range(&mut self, range: Range) -> Result<(), MergeError> {
        self.merges.add(range)?;
        let anchor = range.start;
        self.cells
            .retain(|cell, _| *cell == anchor || !range.contains(*cell));
        Ok(())
    }

    /// Remove every merge touching `range`.
    pub fn unmerge_range(&mut self, range: Range) -> usize {
        self.merges.remove_intersecting(range)
    }

    pub fn merged_regions(&self) -> &MergedRegions {
        &self.merges
    }

    /// All cells whose display text matches `needle`, in row-major order.
    pub fn find_all(&self, needle: &str, options: FindOptions) -> Vec<CellRef> {
        self.cells
            .iter()
            .filter(|(_, cell)| options.matches(&cell.value.to_string(), needle))
            .map(|(cell_ref, _)| *cell_ref)
            .collect()
    }

    /// The first match of `needle` in row-major order.
    pub fn find_next(&self, needle: &str, options: FindOptions) -> Option<CellRef> {
        self.cells
            .iter()
            .find(|(_, cell)| options.matches(&cell.value.to_string(), needle))
            .map(|(cell_ref, _)| *cell_ref)
    }

    /// Values of `range` as rows of cells.
    pub fn values(&self, range: Range) -> Vec<Vec<CellValue>> {
        (range.start.row..=range.end.row)
            .map(|row| {
                (range.start.col..=range.end.col)
                    .map(|col| self.value(CellRef::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Write a block of values with its top-left corner at `origin`.
    pub fn set_values(&mut self, origin: CellRef, values: &[Vec<CellValue>]) {
        for (dr, row) in values.iter().enumerate() {
            for (dc, value) in row.iter().enumerate() {
                let cell = CellRef::new(origin.row + dr as u32, origin.col + dc as u32);
                self.set_value(cell, value.clone());
            }
        }
    }

    fn anchor_of(&self, cell: CellRef) -> CellRef {
        self.merges
            .containing(cell)
            .map(|range| range.start)
            .unwrap_or(cell)
    }
}

/// Errors raised while loading a worksheet snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("invalid cell reference `{reference}`: {source}")]
    Cell {
        reference: String,
        source: A1ParseError,
    },
    #[error("invalid range `{reference}`: {source}")]
    Range {
        reference: String,
        source: RangeParseError,
    },
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("duplicate sheet name `{0}`")]
    DuplicateSheet(String),
    #[error("named range `{name}` refers to unknown sheet `{sheet}`")]
    UnknownSheet { name: String, sheet: String },
}

/// JSON-friendly worksheet layout keyed by A1 references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorksheetSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cells: BTreeMap<String, CellValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formulas: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<String>,
}

fn parse_cell(reference: &str) -> Result<CellRef, SnapshotError> {
    CellRef::from_a1(reference).map_err(|source| SnapshotError::Cell {
        reference: reference.to_string(),
        source,
    })
}

pub(crate) fn parse_range(reference: &str) -> Result<Range, SnapshotError> {
    Range::from_a1(reference).map_err(|source| SnapshotError::Range {
        reference: reference.to_string(),
        source,
    })
}

impl TryFrom<WorksheetSnapshot> for Worksheet {
    type Error = SnapshotError;

    fn try_from(snapshot: WorksheetSnapshot) -> Result<Self, Self::Error> {
        let mut sheet = Worksheet::new(snapshot.name);
        for (reference, value) in snapshot.cells {
            sheet.set_value(parse_cell(&reference)?, value);
        }
        for (reference, formula) in snapshot.formulas {
            sheet.set_formula(parse_cell(&reference)?, formula);
        }
        // Merge last so that the anchor keeps the value given for it.
        for reference in &snapshot.merges {
            sheet.merge_range(parse_range(reference)?)?;
        }
        Ok(sheet)
    }
}

impl From<Worksheet> for WorksheetSnapshot {
    fn from(sheet: Worksheet) -> Self {
        let mut snapshot = WorksheetSnapshot {
            name: sheet.name,
            ..WorksheetSnapshot::default()
        };
        for (cell_ref, cell) in sheet.cells {
            if let Some(formula) = cell.formula {
                snapshot.formulas.insert(cell_ref.to_a1(), formula);
            } else {
                snapshot.cells.insert(cell_ref.to_a1(), cell.value);
            }
        }
        snapshot.merges = sheet
            .merges
            .iter()
            .map(|m| m.range.to_string())
            .collect();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_all_returns_row_major_order() {
        let mut sheet = Worksheet::new("Scoring");
        sheet.set_value(CellRef::new(15, 7), "Score");
        sheet.set_value(CellRef::new(3, 9), "Score");
        sheet.set_value(CellRef::new(3, 7), "Raw Score");

        let hits = sheet.find_all("score", FindOptions::substring());
        assert_eq!(
            hits,
            vec![CellRef::new(3, 7), CellRef::new(3, 9), CellRef::new(15, 7)]
        );

        let exact = sheet.find_all("Score", FindOptions::entire_cell());
        assert_eq!(exact, vec![CellRef::new(3, 9), CellRef::new(15, 7)]);
        assert_eq!(
            sheet.find_next("Score", FindOptions::entire_cell()),
            Some(CellRef::new(3, 9))
        );
    }

    #[test]
    fn set_formula_replaces_value() {
        let mut sheet = Worksheet::new("Sheet1");
        let c2 = CellRef::new(2, 3);
        sheet.set_value(c2, 4.0);
        sheet.set_formula(c2, "=1+1");
        assert_eq!(sheet.formula(c2), Some("=1+1"));
        assert_eq!(sheet.value(c2), CellValue::Empty);

        sheet.set_formula(c2, "");
        assert_eq!(sheet.formula(c2), None);
        assert_eq!(sheet.cell_count(), 0);
    }

    #[test]
    fn values_block_roundtrips_through_set_values() {
        let mut sheet = Worksheet::new("Sheet1");
        let block = vec![
            vec![CellValue::from(101.0), CellValue::from("Lincoln")],
            vec![CellValue::from(102.0), CellValue::from("Roosevelt")],
        ];
        sheet.set_values(CellRef::new(4, 2), &block);
        let read = sheet.values(Range::from_a1("B4:C5").unwrap());
        assert_eq!(read, block);
    }
}
