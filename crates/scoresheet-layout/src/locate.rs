//! Anchor lookup in sheets whose exact layout is not known in advance.
//!
//! Two modes exist:
//! - **simple** ([`locate_label`]): the first substring match in the left-hand label
//!   area, used for single-column anchors like `Team #`;
//! - **banded** ([`locate_header`]): the lowest whole-cell match inside the score band
//!   and above the header ceiling, then moved below any merged header rows.

use scoresheet_model::{CellRef, FindOptions};

use crate::band::resolve_column_band;
use crate::merge_scan::first_unmerged_row;
use crate::{DocumentAccess, LayoutConfig, LayoutError, SheetAccess};

/// A cell whose text matched a searched label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorMatch {
    pub sheet: String,
    pub cell: CellRef,
    /// Full display text of the matched cell.
    pub text: String,
}

/// A score header and the first data row beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLocation {
    pub sheet: String,
    /// The header cell (top-left of its merge, if merged).
    pub header: CellRef,
    /// First unmerged cell below the header, in the header's column.
    pub data_start: CellRef,
}

/// Where a simple-mode search looks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchScope<'a> {
    /// The conventional scoring sheet (see [`scoring_sheet`]).
    #[default]
    ScoringSheet,
    /// One sheet, by name.
    Sheet(&'a str),
    /// Every sheet, in tab order.
    AllSheets,
}

/// The sheet grading data lives on: the first of `scoring_sheet_names` that exists,
/// otherwise the document's first sheet.
pub fn scoring_sheet<'d, D: DocumentAccess>(
    doc: &'d D,
    config: &LayoutConfig,
) -> Option<&'d D::Sheet> {
    config
        .scoring_sheet_names
        .iter()
        .find_map(|name| doc.sheet_by_name(name))
        .or_else(|| doc.first_sheet())
}

/// Simple-mode lookup: the first substring match of `label` left of
/// `label_column_limit`.
///
/// Matches further right are skipped rather than accepted, so a label repeated in a
/// score block never stands in for the roster column.
pub fn locate_label<D: DocumentAccess>(
    doc: &D,
    label: &str,
    scope: SearchScope<'_>,
    config: &LayoutConfig,
) -> Option<AnchorMatch> {
    match scope {
        SearchScope::ScoringSheet => {
            let sheet = scoring_sheet(doc, config)?;
            first_label_match(sheet, label, config)
        }
        SearchScope::Sheet(name) => {
            let sheet = doc.sheet_by_name(name)?;
            first_label_match(sheet, label, config)
        }
        SearchScope::AllSheets => doc
            .sheet_names()
            .iter()
            .filter_map(|name| doc.sheet_by_name(name))
            .find_map(|sheet| first_label_match(sheet, label, config)),
    }
}

/// Simple-mode lookup within a single sheet.
pub fn first_label_match<S: SheetAccess + ?Sized>(
    sheet: &S,
    label: &str,
    config: &LayoutConfig,
) -> Option<AnchorMatch> {
    sheet
        .find_all(label, FindOptions::substring())
        .into_iter()
        .find(|cell| cell.col < config.label_column_limit)
        .map(|cell| AnchorMatch {
            sheet: sheet.name().to_string(),
            cell,
            text: sheet.text(cell),
        })
}

/// Banded-mode lookup of a score header on the document's scoring sheet.
///
/// Returns `Ok(None)` when the sheet, the band markers, or the header cannot be found;
/// callers treat that column as absent. Only a runaway merge scan is an error.
pub fn locate_header<D: DocumentAccess>(
    doc: &D,
    label: &str,
    config: &LayoutConfig,
) -> Result<Option<HeaderLocation>, LayoutError> {
    let Some(sheet) = scoring_sheet(doc, config) else {
        log::debug!("`{}` has no scoring sheet", doc.reference());
        return Ok(None);
    };
    locate_header_in_sheet(sheet, label, config)
}

/// Banded-mode lookup within a single sheet.
pub fn locate_header_in_sheet<S: SheetAccess + ?Sized>(
    sheet: &S,
    label: &str,
    config: &LayoutConfig,
) -> Result<Option<HeaderLocation>, LayoutError> {
    let Some(band) = resolve_column_band(sheet, config) else {
        return Ok(None);
    };

    // The same header text can repeat higher up in unrelated blocks; the lowest
    // occurrence inside the band is the one directly above the data.
    let mut best: Option<CellRef> = None;
    for cell in sheet.find_all(label, FindOptions::entire_cell()) {
        if !band.contains(cell.col) || cell.row >= config.header_row_ceiling {
            continue;
        }
        match best {
            Some(current) if cell.row <= current.row => {}
            _ => best = Some(cell),
        }
    }

    let Some(header) = best else {
        log::debug!(
            "no `{label}` header in columns {}..={} above row {} on sheet `{}`",
            band.min_col(),
            band.max_col(),
            config.header_row_ceiling,
            sheet.name()
        );
        return Ok(None);
    };

    let row = first_unmerged_row(sheet, header.col, header.row, config)?;
    Ok(Some(HeaderLocation {
        sheet: sheet.name().to_string(),
        header,
        data_start: CellRef::new(row, header.col),
    }))
}
