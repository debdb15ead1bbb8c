use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum rows per worksheet accepted when parsing A1 references.
pub const MAX_ROWS: u32 = 10_000_000;

/// Maximum columns per worksheet accepted when parsing A1 references (`ZZZ`).
pub const MAX_COLS: u32 = 18_278;

/// A reference to a single cell within a worksheet.
///
/// Rows and columns are **1-based**, matching the hosting spreadsheet convention:
/// - `row = 1` is the first row
/// - `col = 1` is column `A`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    /// 1-based row.
    pub row: u32,
    /// 1-based column.
    pub col: u32,
}

impl CellRef {
    /// Construct a new [`CellRef`].
    ///
    /// Panics if either coordinate is zero.
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        Self { row, col }
    }

    /// Convert to A1 notation (e.g. `A1`, `BC32`).
    pub fn to_a1(self) -> String {
        format!("{}{}", column_label(self.col), self.row)
    }

    /// Parse an A1-style reference (e.g. `A1`, `$B$2`).
    pub fn from_a1(a1: &str) -> Result<Self, A1ParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(A1ParseError::Empty);
        }

        // Accept optional `$` markers.
        let mut idx = 0usize;
        let bytes = s.as_bytes();
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(A1ParseError::MissingColumn);
        }

        let col_str = &s[col_start..idx];
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start {
            return Err(A1ParseError::MissingRow);
        }
        if idx != bytes.len() {
            return Err(A1ParseError::TrailingCharacters);
        }

        let col = column_index(col_str)?;
        let row: u32 = s[row_start..idx]
            .parse()
            .map_err(|_| A1ParseError::InvalidRow)?;
        if row == 0 || row > MAX_ROWS {
            return Err(A1ParseError::InvalidRow);
        }

        Ok(Self { row, col })
    }

    /// Returns a new reference shifted down by `rows`.
    #[inline]
    pub const fn offset_rows(self, rows: u32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col,
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// A rectangular region within a worksheet.
///
/// The range is inclusive and always normalized such that:
/// - `start.row <= end.row`
/// - `start.col <= end.col`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: CellRef,
    pub end: CellRef,
}

impl Range {
    /// Construct a new range, normalizing coordinates if needed.
    pub const fn new(a: CellRef, b: CellRef) -> Self {
        let start_row = if a.row <= b.row { a.row } else { b.row };
        let end_row = if a.row <= b.row { b.row } else { a.row };
        let start_col = if a.col <= b.col { a.col } else { b.col };
        let end_col = if a.col <= b.col { b.col } else { a.col };
        Self {
            start: CellRef::new(start_row, start_col),
            end: CellRef::new(end_row, end_col),
        }
    }

    /// A block of `height` rows by `width` columns whose top-left corner is `origin`.
    ///
    /// The far corner saturates at `u32::MAX` instead of wrapping. Panics if either
    /// dimension is zero.
    pub const fn with_size(origin: CellRef, height: u32, width: u32) -> Self {
        assert!(height >= 1 && width >= 1, "range dimensions must be non-zero");
        Self {
            start: origin,
            end: CellRef::new(
                origin.row.saturating_add(height - 1),
                origin.col.saturating_add(width - 1),
            ),
        }
    }

    /// Returns true if `cell` lies within this range.
    #[inline]
    pub const fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    /// Returns true if the two ranges share at least one cell.
    ///
    /// Edges are inclusive: ranges that only touch along a row or column intersect.
    #[inline]
    pub const fn intersects(&self, other: &Range) -> bool {
        if self.end.row < other.start.row {
            return false;
        }
        if other.end.row < self.start.row {
            return false;
        }
        if self.end.col < other.start.col {
            return false;
        }
        if other.end.col < self.start.col {
            return false;
        }
        true
    }

    /// Number of columns in the range.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Number of rows in the range.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Returns true if the range is exactly one cell.
    #[inline]
    pub const fn is_single_cell(&self) -> bool {
        self.start.row == self.end.row && self.start.col == self.end.col
    }

    /// Iterate the cells of the range in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellRef::new(row, col))
        })
    }

    /// Parse an A1-style range like `A1:B2` or a single-cell reference like `C3`.
    pub fn from_a1(a1: &str) -> Result<Self, RangeParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(RangeParseError::Empty);
        }

        match s.split_once(':') {
            None => {
                let cell = CellRef::from_a1(s).map_err(RangeParseError::Cell)?;
                Ok(Range::new(cell, cell))
            }
            Some((a, b)) => {
                let start = CellRef::from_a1(a).map_err(RangeParseError::Cell)?;
                let end = CellRef::from_a1(b).map_err(RangeParseError::Cell)?;
                Ok(Range::new(start, end))
            }
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// Errors that can occur when parsing an A1 cell reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum A1ParseError {
    Empty,
    MissingColumn,
    MissingRow,
    InvalidColumn,
    InvalidRow,
    TrailingCharacters,
}

impl fmt::Display for A1ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            A1ParseError::Empty => "empty A1 reference",
            A1ParseError::MissingColumn => "missing column in A1 reference",
            A1ParseError::MissingRow => "missing row in A1 reference",
            A1ParseError::InvalidColumn => "invalid column in A1 reference",
            A1ParseError::InvalidRow => "invalid row in A1 reference",
            A1ParseError::TrailingCharacters => "trailing characters in A1 reference",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for A1ParseError {}

/// Errors that can occur when parsing an A1 range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    Empty,
    Cell(A1ParseError),
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeParseError::Empty => f.write_str("empty A1 range"),
            RangeParseError::Cell(e) => write!(f, "invalid cell reference in range: {e}"),
        }
    }
}

impl std::error::Error for RangeParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RangeParseError::Empty => None,
            RangeParseError::Cell(e) => Some(e),
        }
    }
}

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Convert a 1-based column index into its letter label (`1 -> A`, `27 -> AA`).
///
/// This is bijective base-26: there is no zero digit, so a remainder of zero borrows
/// one from the quotient and becomes `Z`.
///
/// Panics if `col` is zero.
pub fn column_label(col: u32) -> String {
    assert!(col >= 1, "column index is 1-based");
    if col <= 26 {
        return char::from(ALPHABET[(col - 1) as usize]).to_string();
    }

    let mut res = col % 26;
    let mut div = col / 26;
    if res == 0 {
        res = 26;
        div -= 1;
    }
    let mut label = column_label(div);
    label.push(char::from(ALPHABET[(res - 1) as usize]));
    label
}

/// Parse a column label (case-insensitive) into its 1-based index.
pub fn column_index(label: &str) -> Result<u32, A1ParseError> {
    let mut col: u32 = 0;
    for b in label.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(A1ParseError::InvalidColumn);
        }
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or(A1ParseError::InvalidColumn)?;
    }
    if col == 0 || col > MAX_COLS {
        return Err(A1ParseError::InvalidColumn);
    }
    Ok(col)
}
