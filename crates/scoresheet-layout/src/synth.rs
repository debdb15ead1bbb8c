//! Cross-document formula synthesis.
//!
//! Two directions are wired:
//! - [`link_scoring_sheet`]: an event spreadsheet imports the `Score`/`Tier`/`Tiebreaker`
//!   columns of its grading scoresheet, whose header positions are inferred;
//! - [`link_event_sheet`]: the master spreadsheet imports the fixed score columns of an
//!   event spreadsheet back into that event's tab.

use serde::Serialize;

use scoresheet_model::CellRef;

use crate::formula::{column_span, import_range_formula, sheet_column_range};
use crate::locate::locate_header;
use crate::{DocumentAccess, LayoutConfig, LayoutError};

/// A formula that was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkedColumn {
    pub header: String,
    /// Cell that received the formula, in A1 notation.
    pub cell: String,
    /// Imported range, as embedded in the formula.
    pub source_range: String,
    pub formula: String,
}

/// Outcome of linking one destination sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub destination: String,
    pub linked: Vec<LinkedColumn>,
    /// Headers that could not be located and were left untouched.
    pub skipped: Vec<String>,
}

impl LinkReport {
    fn new(destination: &str) -> Self {
        Self {
            destination: destination.to_string(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Write the scoring-direction import formulas into `destination_sheet` of `target`.
///
/// For each configured column the header is located on `source`'s scoring sheet and
/// the formula imports `import_row_span + 1` rows starting at the first data row. A
/// header that cannot be located is skipped; the remaining columns are still written.
/// A missing destination sheet aborts before anything is written.
pub fn link_scoring_sheet<S, T>(
    source: &S,
    target: &mut T,
    destination_sheet: &str,
    config: &LayoutConfig,
) -> Result<LinkReport, LayoutError>
where
    S: DocumentAccess,
    T: DocumentAccess,
{
    config.validate()?;
    if target.sheet_by_name(destination_sheet).is_none() {
        return Err(LayoutError::SheetNotFound(destination_sheet.to_string()));
    }

    let mut report = LinkReport::new(destination_sheet);
    for link in &config.columns {
        let target_col = config.target_column_index(link)?;

        let Some(location) = locate_header(source, &link.header, config)? else {
            log::warn!(
                "`{}` not found in `{}`; leaving column {} unlinked",
                link.header,
                source.reference(),
                link.target_column
            );
            report.skipped.push(link.header.clone());
            continue;
        };

        let start = location.data_start;
        let source_range = column_span(start.col, start.row, config.import_row_span)
            .ok_or_else(|| {
                LayoutError::InvalidConfig(format!(
                    "`import_row_span` {} from row {} runs past the last row",
                    config.import_row_span, start.row
                ))
            })?;
        let formula = import_range_formula(source.reference(), &source_range);
        let cell = CellRef::new(config.destination_row, target_col);

        log::info!("{} {} {} {}", link.header, start.row, source_range, formula);
        target.set_formula(destination_sheet, cell, &formula)?;

        report.linked.push(LinkedColumn {
            header: link.header.clone(),
            cell: cell.to_a1(),
            source_range,
            formula,
        });
    }

    Ok(report)
}

/// Write the reverse-direction import formulas into the master spreadsheet's tab for
/// `event_name`, pulling the same columns back from the event spreadsheet at
/// `event_reference`.
pub fn link_event_sheet<M: DocumentAccess>(
    master: &mut M,
    event_reference: &str,
    event_name: &str,
    config: &LayoutConfig,
) -> Result<LinkReport, LayoutError> {
    config.validate()?;
    if master.sheet_by_name(event_name).is_none() {
        return Err(LayoutError::SheetNotFound(event_name.to_string()));
    }

    let mut report = LinkReport::new(event_name);
    for link in &config.columns {
        let col = config.target_column_index(link)?;
        let source_range = sheet_column_range(
            event_name,
            col,
            config.destination_row,
            config.event_range_last_row,
        );
        let formula = import_range_formula(event_reference, &source_range);
        let cell = CellRef::new(config.destination_row, col);

        master.set_formula(event_name, cell, &formula)?;
        report.linked.push(LinkedColumn {
            header: link.header.clone(),
            cell: cell.to_a1(),
            source_range,
            formula,
        });
    }

    Ok(report)
}

/// An event whose master tab should import from its event spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventLink {
    pub event_name: String,
    pub event_reference: String,
}

/// Result of linking every event back into the master spreadsheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventLinkSummary {
    pub linked: Vec<LinkReport>,
    /// Events with no tab in the master spreadsheet.
    pub missing_tabs: Vec<String>,
}

/// Run [`link_event_sheet`] for each event in order.
///
/// An event without a master tab is recorded and the loop moves on; any other failure
/// stops the batch.
pub fn link_events<M: DocumentAccess>(
    master: &mut M,
    events: &[EventLink],
    config: &LayoutConfig,
) -> Result<EventLinkSummary, LayoutError> {
    let mut summary = EventLinkSummary::default();
    for event in events {
        match link_event_sheet(master, &event.event_reference, &event.event_name, config) {
            Ok(report) => {
                log::info!(
                    "linked {} column(s) for `{}`",
                    report.linked.len(),
                    event.event_name
                );
                summary.linked.push(report);
            }
            Err(LayoutError::SheetNotFound(name)) => {
                log::warn!("sheet for event `{name}` does not exist");
                summary.missing_tabs.push(name);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoresheet_model::Workbook;

    #[test]
    fn missing_destination_sheet_aborts_without_writes() {
        let mut source = Workbook::new("doc://grading");
        let sheet = source.add_sheet("Scoring");
        sheet.set_value(CellRef::new(2, 3), "Final Scores");
        sheet.set_value(CellRef::new(5, 3), "Score");

        let mut target = Workbook::new("doc://event");
        target.add_sheet("Other");

        let err = link_scoring_sheet(&source, &mut target, "Anatomy", &LayoutConfig::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::SheetNotFound("Anatomy".into()));
        assert_eq!(target.sheet("Other").unwrap().cell_count(), 0);
    }

    #[test]
    fn oversized_import_span_is_rejected_before_writing() {
        let mut source = Workbook::new("doc://grading");
        let sheet = source.add_sheet("Scoring");
        sheet.set_value(CellRef::new(2, 3), "Final Scores");
        sheet.set_value(CellRef::new(3, 3), "Score");

        let mut target = Workbook::new("doc://event");
        target.add_sheet("Anatomy");

        let config: LayoutConfig = serde_json::from_str(r#"{"import_row_span": 4294967295}"#)
            .unwrap();
        let err = link_scoring_sheet(&source, &mut target, "Anatomy", &config).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(msg) if msg.contains("import_row_span")));
        assert_eq!(target.sheet("Anatomy").unwrap().cell_count(), 0);
    }

    #[test]
    fn reverse_direction_writes_fixed_ranges() {
        let mut master = Workbook::new("doc://master");
        master.add_sheet("Anatomy");

        let report = link_event_sheet(
            &mut master,
            "doc://event/anatomy",
            "Anatomy",
            &LayoutConfig::default(),
        )
        .unwrap();

        let cells: Vec<&str> = report.linked.iter().map(|l| l.cell.as_str()).collect();
        assert_eq!(cells, ["C2", "D2", "E2"]);
        let sheet = master.sheet("Anatomy").unwrap();
        assert_eq!(
            sheet.formula(CellRef::new(2, 4)),
            Some(r#"=IMPORTRANGE("doc://event/anatomy", "Anatomy!D2:D104")"#)
        );
    }

    #[test]
    fn batch_linking_skips_events_without_tabs() {
        let mut master = Workbook::new("doc://master");
        master.add_sheet("Anatomy");
        master.add_sheet("Codebusters");

        let events = [
            EventLink {
                event_name: "Anatomy".into(),
                event_reference: "doc://event/anatomy".into(),
            },
            EventLink {
                event_name: "Fossils".into(),
                event_reference: "doc://event/fossils".into(),
            },
            EventLink {
                event_name: "Codebusters".into(),
                event_reference: "doc://event/codebusters".into(),
            },
        ];
        let summary = link_events(&mut master, &events, &LayoutConfig::default()).unwrap();
        assert_eq!(summary.linked.len(), 2);
        assert_eq!(summary.missing_tabs, ["Fossils"]);
        assert!(master
            .sheet("Codebusters")
            .unwrap()
            .formula(CellRef::new(2, 3))
            .is_some());
    }
}
