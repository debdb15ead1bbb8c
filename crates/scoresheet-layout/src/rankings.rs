//! Placeholder text for the awards slide deck.
//!
//! The final-rankings sheet lists each event under a heading row in the label area;
//! placings start two rows below it with the rank, team, and school in columns A–C.
//! Slide editing itself belongs to the presentation collaborator; this module only
//! produces the `(placeholder, text)` pairs it substitutes.

use serde::Serialize;

use scoresheet_model::CellRef;

use crate::locate::first_label_match;
use crate::{DocumentAccess, LayoutConfig, LayoutError, SheetAccess};

pub const RANKINGS_SHEET: &str = "Final Rankings";
pub const OVERALL_HEADING: &str = "Overall Team Results";

/// Placings shown on an event slide.
pub const EVENT_PLACES: u32 = 4;
/// Placings shown on the overall results slide.
pub const OVERALL_PLACES: u32 = 8;

/// Text substitutions for one slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlideReplacements {
    pub title: String,
    pub replacements: Vec<(String, String)>,
}

/// Placing lines under `heading`: one per row from two to `places + 1` rows below it,
/// formatted `A\t\tB\tC`. Empty when the heading is not in the label area.
pub fn ranking_entries<S: SheetAccess + ?Sized>(
    sheet: &S,
    heading: &str,
    places: u32,
    config: &LayoutConfig,
) -> Vec<String> {
    let Some(anchor) = first_label_match(sheet, heading, config) else {
        log::warn!("`{heading}` not found on sheet `{}`", sheet.name());
        return Vec::new();
    };

    (2..=places + 1)
        .map(|offset| {
            let row = anchor.cell.row + offset;
            format!(
                "{}\t\t{}\t{}",
                sheet.text(CellRef::new(row, 1)),
                sheet.text(CellRef::new(row, 2)),
                sheet.text(CellRef::new(row, 3)),
            )
        })
        .collect()
}

fn placeholders(entries: Vec<String>, places: u32) -> Vec<(String, String)> {
    let mut entries = entries.into_iter();
    (1..=places)
        .map(|place| (format!("{place}. __"), entries.next().unwrap_or_default()))
        .collect()
}

/// Replacements for an event slide: `EVENT_NAME` plus the top placings.
pub fn event_slide_replacements<S: SheetAccess + ?Sized>(
    sheet: &S,
    event_name: &str,
    config: &LayoutConfig,
) -> SlideReplacements {
    let entries = ranking_entries(sheet, event_name, EVENT_PLACES, config);
    let mut replacements = vec![("EVENT_NAME".to_string(), event_name.to_string())];
    replacements.extend(placeholders(entries, EVENT_PLACES));
    SlideReplacements {
        title: event_name.to_string(),
        replacements,
    }
}

/// Replacements for the overall team results slide.
pub fn overall_slide_replacements<S: SheetAccess + ?Sized>(
    sheet: &S,
    config: &LayoutConfig,
) -> SlideReplacements {
    let entries = ranking_entries(sheet, OVERALL_HEADING, OVERALL_PLACES, config);
    SlideReplacements {
        title: OVERALL_HEADING.to_string(),
        replacements: placeholders(entries, OVERALL_PLACES),
    }
}

/// Event slides in event order, followed by the overall slide.
pub fn slide_deck_replacements<D: DocumentAccess>(
    doc: &D,
    events: &[String],
    config: &LayoutConfig,
) -> Result<Vec<SlideReplacements>, LayoutError> {
    let sheet = doc
        .sheet_by_name(RANKINGS_SHEET)
        .ok_or_else(|| LayoutError::SheetNotFound(RANKINGS_SHEET.to_string()))?;

    let mut slides: Vec<SlideReplacements> = events
        .iter()
        .map(|event| event_slide_replacements(sheet, event, config))
        .collect();
    slides.push(overall_slide_replacements(sheet, config));
    Ok(slides)
}
