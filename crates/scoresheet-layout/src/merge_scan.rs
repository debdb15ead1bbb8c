use scoresheet_model::{column_label, CellRef, Range};

use crate::{LayoutConfig, LayoutError, SheetAccess};

/// First row below `start_row` whose probe window is free of merged cells.
///
/// The probe is `probe_height` rows by `probe_width` columns with its top-left corner at
/// `(row, col)`. Headers in the scoring templates are merged down over several rows and
/// the data starts at the first row whose probe touches no merge. The returned row is
/// always at least `start_row + 1`.
///
/// The scan is capped at `max_scan_rows` rows; exceeding it means the sheet does not
/// follow any known layout and is reported as [`LayoutError::ScanLimitExceeded`].
pub fn first_unmerged_row<S: SheetAccess + ?Sized>(
    sheet: &S,
    col: u32,
    start_row: u32,
    config: &LayoutConfig,
) -> Result<u32, LayoutError> {
    let first = start_row.saturating_add(1);
    for row in first..first.saturating_add(config.max_scan_rows) {
        let probe = Range::with_size(
            CellRef::new(row, col),
            config.probe_height,
            config.probe_width,
        );
        // Merge state is fetched per probe; it is never cached across rows.
        let merged = sheet.merged_regions(probe);
        if !merged.iter().any(|region| region.intersects(&probe)) {
            return Ok(row);
        }
    }

    Err(LayoutError::ScanLimitExceeded {
        sheet: sheet.name().to_string(),
        column: column_label(col),
        start_row,
        limit: config.max_scan_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoresheet_model::Worksheet;

    fn sheet_with_merges(merges: &[&str]) -> Worksheet {
        let mut sheet = Worksheet::new("Scoring");
        for a1 in merges {
            sheet.merge_range(Range::from_a1(a1).unwrap()).unwrap();
        }
        sheet
    }

    #[test]
    fn header_merged_over_three_rows_resolves_below_it() {
        let sheet = sheet_with_merges(&["G3:G5"]);
        let row = first_unmerged_row(&sheet, 7, 3, &LayoutConfig::default()).unwrap();
        assert_eq!(row, 6);
    }

    #[test]
    fn unmerged_header_resolves_to_next_row() {
        let sheet = sheet_with_merges(&[]);
        let row = first_unmerged_row(&sheet, 7, 3, &LayoutConfig::default()).unwrap();
        assert_eq!(row, 4);
    }

    #[test]
    fn merges_to_the_right_within_the_probe_also_count() {
        // A merged title block 10 columns right of the header still pushes the scan down.
        let sheet = sheet_with_merges(&["Q5:T7"]);
        let row = first_unmerged_row(&sheet, 7, 3, &LayoutConfig::default()).unwrap();
        assert_eq!(row, 8);
    }

    #[test]
    fn merges_outside_the_probe_are_ignored() {
        // Column AA is 20 columns right of G: just outside a 20-wide probe.
        let sheet = sheet_with_merges(&["AA4:AB9", "A4:F9"]);
        let row = first_unmerged_row(&sheet, 7, 3, &LayoutConfig::default()).unwrap();
        assert_eq!(row, 4);
    }

    #[test]
    fn runaway_scan_is_reported() {
        let sheet = sheet_with_merges(&["G4:H400"]);
        let config = LayoutConfig {
            max_scan_rows: 50,
            ..LayoutConfig::default()
        };
        let err = first_unmerged_row(&sheet, 7, 3, &config).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ScanLimitExceeded {
                sheet: "Scoring".into(),
                column: "G".into(),
                start_row: 3,
                limit: 50,
            }
        );
    }

    #[test]
    fn oversized_probe_covers_the_rest_of_the_sheet() {
        let sheet = sheet_with_merges(&["ZZ200:ZZ201"]);
        let config = LayoutConfig {
            probe_width: u32::MAX,
            probe_height: u32::MAX,
            max_scan_rows: 4,
            ..LayoutConfig::default()
        };
        let err = first_unmerged_row(&sheet, 7, 3, &config).unwrap_err();
        assert!(matches!(err, LayoutError::ScanLimitExceeded { limit: 4, .. }));
    }
}
