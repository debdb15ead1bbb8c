//! `scoresheet-model` defines the in-memory spreadsheet structures the layout engine
//! reads and writes.
//!
//! The model is deliberately small: sparse cell values and formulas, merged regions,
//! case-insensitive text search, and workbook-scoped named ranges. It doubles as the
//! JSON snapshot format consumed by the `scoresheet-link` binary.

mod address;
mod merge;
mod search;
mod value;
mod workbook;
mod worksheet;

pub use address::{
    column_index, column_label, A1ParseError, CellRef, Range, RangeParseError, MAX_COLS,
    MAX_ROWS,
};
pub use merge::{MergeError, MergedRegion, MergedRegions};
pub use search::FindOptions;
pub use value::CellValue;
pub use workbook::{NamedRange, Workbook, WorkbookSnapshot};
pub use worksheet::{Cell, SnapshotError, Worksheet, WorksheetSnapshot};
