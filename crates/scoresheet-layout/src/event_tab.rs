//! Populating per-event tabs created from the blank score sheet.
//!
//! A new event tab starts as a copy of `Blank Score Sheet`. It then needs the event name
//! in its title block, the template's team and helper blocks, and (in the master
//! spreadsheet) whether a high or a low score wins that event.

use serde::Serialize;

use scoresheet_model::{CellRef, CellValue, Range, MAX_ROWS};

use crate::tournament::EVENTS_RANGE;
use crate::{DocumentAccess, LayoutError, SheetAccess};

/// Sheet every event tab is created from.
pub const TEMPLATE_SHEET: &str = "Blank Score Sheet";
/// Sheet whose formulas are refreshed after the event tabs change.
pub const MASTER_SCORESHEET: &str = "Master Scoresheet";
/// Named range with one scoring direction per event, in `Events` order.
pub const HIGH_LOW_RANGE: &str = "HighLowScoreWins";
/// Columns of `Master Scoresheet` whose formulas are refreshed.
pub const REFRESH_COLUMNS: u32 = 32;

const fn block(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Range {
    Range::new(
        CellRef::new(first_row, first_col),
        CellRef::new(last_row, last_col),
    )
}

/// `L2:O2`, the event title.
pub const EVENT_NAME_CELLS: Range = block(2, 12, 2, 15);
/// `L4:O4` and `L5:O5`, the scoring direction.
pub const SCORING_DIRECTION_CELLS: [Range; 2] = [block(4, 12, 4, 15), block(5, 12, 5, 15)];
/// Blocks copied verbatim from the template: `A2:B104`, `AE7:AE9`, `AA8`, `U3:U103`
/// and `K1:O1`.
pub const TEMPLATE_BLOCKS: [Range; 5] = [
    block(2, 1, 104, 2),
    block(7, 31, 9, 31),
    block(8, 27, 8, 27),
    block(3, 21, 103, 21),
    block(1, 11, 1, 15),
];

/// Write `value` into every cell of `range`.
pub fn fill_range<D: DocumentAccess>(
    doc: &mut D,
    sheet: &str,
    range: Range,
    value: &CellValue,
) -> Result<(), LayoutError> {
    let row = vec![value.clone(); range.width() as usize];
    let rows = vec![row; range.height() as usize];
    doc.set_values(sheet, range.start, &rows)?;
    Ok(())
}

/// Title an event spreadsheet's new tab and copy the template blocks into it.
///
/// `template` is the master spreadsheet's blank score sheet; `target_sheet` is the tab
/// in `target` that was created from it.
pub fn copy_template_blocks<S, D>(
    template: &S,
    target: &mut D,
    target_sheet: &str,
    event_name: &str,
) -> Result<(), LayoutError>
where
    S: SheetAccess + ?Sized,
    D: DocumentAccess,
{
    if target.sheet_by_name(target_sheet).is_none() {
        return Err(LayoutError::SheetNotFound(target_sheet.to_string()));
    }

    fill_range(target, target_sheet, EVENT_NAME_CELLS, &CellValue::from(event_name))?;
    for range in TEMPLATE_BLOCKS {
        let values = template.values(range);
        target.set_values(target_sheet, range.start, &values)?;
    }
    log::info!(
        "copied {} template blocks from `{}` into `{}`",
        TEMPLATE_BLOCKS.len(),
        template.name(),
        target_sheet
    );
    Ok(())
}

/// Outcome of [`label_event_tabs`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TabLabelSummary {
    /// Event tabs that received a title and a scoring direction.
    pub labeled: Vec<String>,
    /// Events without a tab in the master spreadsheet.
    pub missing_tabs: Vec<String>,
    /// Events with no `HighLowScoreWins` entry; their title is still written.
    pub missing_direction: Vec<String>,
}

/// Write each event's name and scoring direction into its master-spreadsheet tab.
///
/// Events and directions are paired by position after blank cells are dropped from both
/// named ranges.
pub fn label_event_tabs<D: DocumentAccess>(
    master: &mut D,
) -> Result<TabLabelSummary, LayoutError> {
    let events = non_blank_values(master, EVENTS_RANGE)?;
    let directions = non_blank_values(master, HIGH_LOW_RANGE)?;

    let mut summary = TabLabelSummary::default();
    for (idx, event) in events.iter().enumerate() {
        let event_name = event.to_string();
        if master.sheet_by_name(&event_name).is_none() {
            log::warn!("no tab for event `{event_name}`");
            summary.missing_tabs.push(event_name);
            continue;
        }

        fill_range(master, &event_name, EVENT_NAME_CELLS, event)?;
        match directions.get(idx) {
            Some(direction) => {
                for range in SCORING_DIRECTION_CELLS {
                    fill_range(master, &event_name, range, direction)?;
                }
                log::info!("{event_name}: {direction}");
                summary.labeled.push(event_name);
            }
            None => {
                log::warn!("`{HIGH_LOW_RANGE}` has no entry for `{event_name}`");
                summary.missing_direction.push(event_name);
            }
        }
    }
    Ok(summary)
}

/// Clear and re-enter every formula in the first `max_columns` columns of `sheet`, so
/// cross-tab references pick up tabs that were added since.
///
/// Returns the number of formulas re-entered.
pub fn refresh_formulas<D: DocumentAccess>(
    doc: &mut D,
    sheet: &str,
    max_columns: u32,
) -> Result<usize, LayoutError> {
    let formulas = {
        let Some(tab) = doc.sheet_by_name(sheet) else {
            return Err(LayoutError::SheetNotFound(sheet.to_string()));
        };
        if max_columns == 0 {
            return Ok(0);
        }
        tab.formulas(block(1, 1, MAX_ROWS, max_columns))
    };

    for (cell, formula) in &formulas {
        doc.set_formula(sheet, *cell, "")?;
        doc.set_formula(sheet, *cell, formula)?;
    }
    log::debug!("refreshed {} formulas on `{sheet}`", formulas.len());
    Ok(formulas.len())
}

fn non_blank_values<D: DocumentAccess>(
    doc: &D,
    name: &str,
) -> Result<Vec<CellValue>, LayoutError> {
    let values = doc
        .named_values(name)
        .ok_or_else(|| LayoutError::NamedRangeNotFound(name.to_string()))?;
    Ok(values
        .into_iter()
        .flatten()
        .filter(|value| !value.is_blank())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scoresheet_model::Workbook;

    fn master() -> Workbook {
        let mut wb = Workbook::new("doc://master");
        let setup = wb.add_sheet("Setup");
        setup.set_value(CellRef::new(2, 1), "Anatomy");
        setup.set_value(CellRef::new(4, 1), "Codebusters");
        setup.set_value(CellRef::new(5, 1), "Fossils");
        setup.set_value(CellRef::new(2, 2), "High");
        setup.set_value(CellRef::new(3, 2), "Low");
        wb.define_name(EVENTS_RANGE, "Setup", Range::from_a1("A2:A6").unwrap());
        wb.define_name(HIGH_LOW_RANGE, "Setup", Range::from_a1("B2:B6").unwrap());
        wb.add_sheet("Anatomy");
        wb.add_sheet("Codebusters");
        wb
    }

    #[test]
    fn labels_pair_events_with_directions_after_dropping_blanks() {
        let mut wb = master();
        let summary = label_event_tabs(&mut wb).unwrap();
        assert_eq!(summary.labeled, ["Anatomy", "Codebusters"]);
        assert_eq!(summary.missing_tabs, ["Fossils"]);
        assert!(summary.missing_direction.is_empty());

        let tab = wb.sheet("Codebusters").unwrap();
        for col in 12..=15 {
            assert_eq!(tab.value(CellRef::new(2, col)), CellValue::from("Codebusters"));
            assert_eq!(tab.value(CellRef::new(4, col)), CellValue::from("Low"));
            assert_eq!(tab.value(CellRef::new(5, col)), CellValue::from("Low"));
        }
        assert_eq!(tab.value(CellRef::new(3, 12)), CellValue::Empty);
    }

    #[test]
    fn events_without_a_direction_still_get_a_title() {
        let mut wb = master();
        wb.sheet_mut("Setup")
            .unwrap()
            .clear_cell(CellRef::new(3, 2));

        let summary = label_event_tabs(&mut wb).unwrap();
        assert_eq!(summary.labeled, ["Anatomy"]);
        assert_eq!(summary.missing_direction, ["Codebusters"]);
        let tab = wb.sheet("Codebusters").unwrap();
        assert_eq!(tab.value(CellRef::new(2, 12)), CellValue::from("Codebusters"));
        assert_eq!(tab.value(CellRef::new(4, 12)), CellValue::Empty);
    }

    #[test]
    fn missing_direction_range_is_an_error() {
        let mut wb = Workbook::new("doc://master");
        wb.add_sheet("Setup").set_value(CellRef::new(2, 1), "Anatomy");
        wb.define_name(EVENTS_RANGE, "Setup", Range::from_a1("A2:A3").unwrap());

        let err = label_event_tabs(&mut wb).unwrap_err();
        assert_eq!(err, LayoutError::NamedRangeNotFound(HIGH_LOW_RANGE.into()));
    }

    #[test]
    fn template_blocks_and_title_land_in_the_new_tab() {
        let mut source = Workbook::new("doc://master");
        let template = source.add_sheet(TEMPLATE_SHEET);
        template.set_value(CellRef::new(3, 1), 101.0);
        template.set_value(CellRef::new(3, 2), "Lincoln High");
        template.set_value(CellRef::new(104, 2), "Roosevelt");
        template.set_value(CellRef::new(8, 27), "=rank helper");
        template.set_value(CellRef::new(1, 11), "Event:");
        template.set_value(CellRef::new(50, 3), "not copied");

        let mut event = Workbook::new("doc://event");
        event.add_sheet("Anatomy").set_value(CellRef::new(3, 1), "stale");

        let template = source.sheet(TEMPLATE_SHEET).unwrap();
        copy_template_blocks(template, &mut event, "Anatomy", "Anatomy").unwrap();

        let tab = event.sheet("Anatomy").unwrap();
        assert_eq!(tab.value(CellRef::new(3, 1)), CellValue::Number(101.0));
        assert_eq!(tab.value(CellRef::new(3, 2)), CellValue::from("Lincoln High"));
        assert_eq!(tab.value(CellRef::new(104, 2)), CellValue::from("Roosevelt"));
        assert_eq!(tab.value(CellRef::new(8, 27)), CellValue::from("=rank helper"));
        assert_eq!(tab.value(CellRef::new(1, 11)), CellValue::from("Event:"));
        assert_eq!(tab.value(CellRef::new(2, 15)), CellValue::from("Anatomy"));
        assert_eq!(tab.value(CellRef::new(50, 3)), CellValue::Empty);
    }

    #[test]
    fn copying_into_a_missing_tab_fails() {
        let template = scoresheet_model::Worksheet::new(TEMPLATE_SHEET);
        let mut event = Workbook::new("doc://event");
        let err = copy_template_blocks(&template, &mut event, "Anatomy", "Anatomy").unwrap_err();
        assert_eq!(err, LayoutError::SheetNotFound("Anatomy".into()));
    }

    #[test]
    fn refresh_reenters_formulas_in_leading_columns_only() {
        let mut wb = Workbook::new("doc://master");
        let sheet = wb.add_sheet(MASTER_SCORESHEET);
        sheet.set_formula(CellRef::new(3, 2), "=Anatomy!C3");
        sheet.set_formula(CellRef::new(3, 32), "=Fossils!C3");
        sheet.set_formula(CellRef::new(3, 33), "=Codebusters!C3");
        sheet.set_value(CellRef::new(3, 1), 101.0);

        let count = refresh_formulas(&mut wb, MASTER_SCORESHEET, REFRESH_COLUMNS).unwrap();
        assert_eq!(count, 2);

        let sheet = wb.sheet(MASTER_SCORESHEET).unwrap();
        assert_eq!(sheet.formula(CellRef::new(3, 2)), Some("=Anatomy!C3"));
        assert_eq!(sheet.formula(CellRef::new(3, 32)), Some("=Fossils!C3"));
        assert_eq!(sheet.formula(CellRef::new(3, 33)), Some("=Codebusters!C3"));
        assert_eq!(sheet.value(CellRef::new(3, 1)), CellValue::Number(101.0));
    }

    #[test]
    fn refresh_of_missing_sheet_fails() {
        let mut wb = Workbook::new("doc://master");
        let err = refresh_formulas(&mut wb, MASTER_SCORESHEET, REFRESH_COLUMNS).unwrap_err();
        assert_eq!(err, LayoutError::SheetNotFound(MASTER_SCORESHEET.into()));
    }
}
