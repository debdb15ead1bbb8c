use serde::Serialize;

use scoresheet_model::{CellRef, CellValue};

use crate::locate::{locate_label, SearchScope};
use crate::{DocumentAccess, LayoutConfig, LayoutError};

/// Rows written below the roster header: one per possible team.
pub const ROSTER_ROWS: usize = 103;

/// Which grading-sheet template the roster was written into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterLayout {
    /// `Team #` header: numbers, schools and team names in B, C, D.
    NumberSchoolName,
    /// `Team Name and State` header: numbers only, in C.
    NameAndState,
}

/// A named range copied into the grading sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterColumn {
    pub named_range: String,
    /// Destination in A1 notation.
    pub range: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterCopy {
    pub sheet: String,
    pub layout: RosterLayout,
    pub columns: Vec<RosterColumn>,
}

const NUMBER_SCHOOL_NAME: &[(&str, u32)] = &[("Team_Numbers", 2), ("Schools", 3), ("Team_Names", 4)];
const NAME_AND_STATE: &[(&str, u32)] = &[("Team_Numbers", 3)];

/// Copy the team roster from `master`'s named ranges into a grading scoresheet.
///
/// The header row is located in simple mode; values fill the [`ROSTER_ROWS`] rows
/// directly beneath it. Returns `Ok(None)` when the grading sheet has neither roster
/// header.
pub fn copy_team_roster<M, T>(
    master: &M,
    grading: &mut T,
    config: &LayoutConfig,
) -> Result<Option<RosterCopy>, LayoutError>
where
    M: DocumentAccess,
    T: DocumentAccess,
{
    let (anchor, layout, columns) =
        if let Some(anchor) = locate_label(grading, "Team #", SearchScope::ScoringSheet, config) {
            (anchor, RosterLayout::NumberSchoolName, NUMBER_SCHOOL_NAME)
        } else if let Some(anchor) =
            locate_label(grading, "Team Name and State", SearchScope::ScoringSheet, config)
        {
            (anchor, RosterLayout::NameAndState, NAME_AND_STATE)
        } else {
            log::warn!("no roster header in `{}`", grading.reference());
            return Ok(None);
        };

    let first_row = anchor.cell.row + 1;
    let mut copied = Vec::with_capacity(columns.len());
    for &(name, col) in columns {
        let values = master
            .named_values(name)
            .ok_or_else(|| LayoutError::NamedRangeNotFound(name.to_string()))?;
        let block = first_column_block(values);

        let origin = CellRef::new(first_row, col);
        grading.set_values(&anchor.sheet, origin, &block)?;

        let end = origin.offset_rows(ROSTER_ROWS as u32 - 1);
        copied.push(RosterColumn {
            named_range: name.to_string(),
            range: format!("{origin}:{end}"),
        });
    }

    Ok(Some(RosterCopy {
        sheet: anchor.sheet,
        layout,
        columns: copied,
    }))
}

/// The first column of a named range, truncated or padded to [`ROSTER_ROWS`].
fn first_column_block(values: Vec<Vec<CellValue>>) -> Vec<Vec<CellValue>> {
    let mut block: Vec<Vec<CellValue>> = values
        .into_iter()
        .take(ROSTER_ROWS)
        .map(|row| vec![row.into_iter().next().unwrap_or_default()])
        .collect();
    block.resize(ROSTER_ROWS, vec![CellValue::Empty]);
    block
}
