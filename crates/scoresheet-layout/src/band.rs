use scoresheet_model::{column_label, FindOptions, MAX_COLS};

use crate::{LayoutConfig, SheetAccess};

/// The columns a score header may occupy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnBand {
    min_col: u32,
    max_col: u32,
}

impl ColumnBand {
    /// A band of `width` columns starting at `min_col`, clamped to the last column.
    pub fn new(min_col: u32, width: u32) -> Self {
        debug_assert!(min_col >= 1 && width >= 1);
        let max_col = min_col
            .checked_add(width.saturating_sub(1))
            .map_or(MAX_COLS, |max| max.min(MAX_COLS));
        Self { min_col, max_col }
    }

    /// The band `offset` columns left of `col`, cut off at column A.
    ///
    /// Returns `None` when the whole band would lie left of column A.
    fn left_of(col: u32, offset: u32, width: u32) -> Option<Self> {
        let start = i64::from(col) - i64::from(offset);
        let end = start + i64::from(width) - 1;
        if end < 1 {
            return None;
        }
        let min_col = u32::try_from(start.max(1)).ok()?;
        let max_col = u32::try_from(end).ok()?.min(MAX_COLS);
        Some(Self { min_col, max_col })
    }

    pub fn min_col(&self) -> u32 {
        self.min_col
    }

    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    #[inline]
    pub fn contains(&self, col: u32) -> bool {
        col >= self.min_col && col <= self.max_col
    }
}

/// Find the score band of a grading sheet.
///
/// Current templates label the band with the primary marker in its first column. Older
/// templates only carry the fallback marker, a fixed number of columns to the right of
/// where the primary marker would be; a band implied left of column A is cut off there.
/// Returns `None` when neither marker is present, or when the implied band lies entirely
/// left of column A.
pub fn resolve_column_band<S: SheetAccess + ?Sized>(
    sheet: &S,
    config: &LayoutConfig,
) -> Option<ColumnBand> {
    let exact = FindOptions::entire_cell();

    if let Some(marker) = sheet.find_next(&config.primary_marker, exact) {
        return Some(ColumnBand::new(marker.col, config.band_width));
    }

    let Some(marker) = sheet.find_next(&config.fallback_marker, exact) else {
        log::debug!(
            "sheet `{}` has neither `{}` nor `{}`",
            sheet.name(),
            config.primary_marker,
            config.fallback_marker
        );
        return None;
    };

    let band = ColumnBand::left_of(marker.col, config.fallback_marker_offset, config.band_width);
    if band.is_none() {
        log::debug!(
            "`{}` at {}{} on sheet `{}` leaves no room for a score band",
            config.fallback_marker,
            column_label(marker.col),
            marker.row,
            sheet.name()
        );
    }
    band
}
