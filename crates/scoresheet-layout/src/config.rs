use serde::{Deserialize, Serialize};

use scoresheet_model::{column_index, MAX_COLS, MAX_ROWS};

use crate::LayoutError;

/// A score column pulled from a grading scoresheet into the event spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLink {
    /// Header text in the grading scoresheet (e.g. `Score`).
    pub header: String,
    /// Column letter in the event spreadsheet (e.g. `C`).
    pub target_column: String,
}

impl ColumnLink {
    pub fn new(header: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            target_column: target_column.into(),
        }
    }
}

/// Layout constants for the known scoresheet templates.
///
/// Every field defaults to the value used by the historical templates, so an empty JSON
/// object (`{}`) is a complete configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Sheets searched, in order, when no sheet is named explicitly. The first sheet of
    /// the document is tried after these.
    pub scoring_sheet_names: Vec<String>,
    /// Whole-cell label whose column starts the score band.
    pub primary_marker: String,
    /// Whole-cell label used by the older template when `primary_marker` is absent.
    pub fallback_marker: String,
    /// Columns between `fallback_marker` and the start of the score band.
    pub fallback_marker_offset: u32,
    /// Number of columns in the score band.
    pub band_width: u32,
    /// Headers must sit strictly above this row.
    pub header_row_ceiling: u32,
    /// Simple-mode labels must sit strictly left of this column.
    pub label_column_limit: u32,
    /// Rows covered by the merge probe.
    pub probe_height: u32,
    /// Columns covered by the merge probe.
    pub probe_width: u32,
    /// Rows the merge resolver may advance before giving up.
    pub max_scan_rows: u32,
    /// Rows past the first data row included in an imported score range.
    pub import_row_span: u32,
    /// Row that receives every generated formula.
    pub destination_row: u32,
    /// Last row of the event-sheet range imported back into the master spreadsheet.
    pub event_range_last_row: u32,
    /// Score columns, in synthesis order.
    pub columns: Vec<ColumnLink>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scoring_sheet_names: vec!["Scoring".to_string(), "Sheet1".to_string()],
            primary_marker: "Final Scores".to_string(),
            fallback_marker: "Final Rankings".to_string(),
            fallback_marker_offset: 6,
            band_width: 6,
            header_row_ceiling: 20,
            label_column_limit: 5,
            probe_height: 5,
            probe_width: 20,
            max_scan_rows: 256,
            import_row_span: 102,
            destination_row: 2,
            event_range_last_row: 104,
            columns: vec![
                ColumnLink::new("Score", "C"),
                ColumnLink::new("Tier", "D"),
                ColumnLink::new("Tiebreaker", "E"),
            ],
        }
    }
}

impl LayoutConfig {
    /// Reject configurations the locator and resolver cannot work with.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let nonzero = [
            ("band_width", self.band_width),
            ("header_row_ceiling", self.header_row_ceiling),
            ("label_column_limit", self.label_column_limit),
            ("probe_height", self.probe_height),
            ("probe_width", self.probe_width),
            ("max_scan_rows", self.max_scan_rows),
            ("destination_row", self.destination_row),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(LayoutError::InvalidConfig(format!("`{field}` must be at least 1")));
            }
        }
        let bounded = [
            ("fallback_marker_offset", self.fallback_marker_offset, MAX_COLS),
            ("band_width", self.band_width, MAX_COLS),
            ("label_column_limit", self.label_column_limit, MAX_COLS),
            ("probe_width", self.probe_width, MAX_COLS),
            ("header_row_ceiling", self.header_row_ceiling, MAX_ROWS),
            ("probe_height", self.probe_height, MAX_ROWS),
            ("max_scan_rows", self.max_scan_rows, MAX_ROWS),
            ("import_row_span", self.import_row_span, MAX_ROWS),
            ("destination_row", self.destination_row, MAX_ROWS),
            ("event_range_last_row", self.event_range_last_row, MAX_ROWS),
        ];
        for (field, value, max) in bounded {
            if value > max {
                return Err(LayoutError::InvalidConfig(format!(
                    "`{field}` must be at most {max}, got {value}"
                )));
            }
        }
        if self.event_range_last_row < self.destination_row {
            return Err(LayoutError::InvalidConfig(
                "`event_range_last_row` must not be above `destination_row`".to_string(),
            ));
        }
        if self.primary_marker.trim().is_empty() || self.fallback_marker.trim().is_empty() {
            return Err(LayoutError::InvalidConfig(
                "band markers must not be empty".to_string(),
            ));
        }
        for link in &self.columns {
            self.target_column_index(link)?;
        }
        Ok(())
    }

    /// 1-based index of a link's target column.
    pub fn target_column_index(&self, link: &ColumnLink) -> Result<u32, LayoutError> {
        column_index(link.target_column.trim()).map_err(|err| {
            LayoutError::InvalidConfig(format!(
                "target column `{}` for `{}`: {err}",
                link.target_column, link.header
            ))
        })
    }
}
