//! Layout inference and cross-document formula synthesis for tournament scoresheets.
//!
//! Grading scoresheets come from a handful of templates with no fixed layout: score
//! headers move between columns, two marker conventions exist for the score block, and
//! header cells are merged over several rows. This crate finds those headers and writes
//! `IMPORTRANGE` formulas that pull the columns beneath them into event spreadsheets,
//! and the event spreadsheets back into the master spreadsheet.
//!
//! Every entry point takes the document explicitly through [`DocumentAccess`]; the
//! in-memory [`scoresheet_model::Workbook`] implements it.

mod band;
mod config;
mod document;
mod error;
pub mod event_tab;
pub mod formula;
pub mod locate;
mod merge_scan;
pub mod rankings;
pub mod roster;
pub mod synth;
pub mod tournament;

pub use band::{resolve_column_band, ColumnBand};
pub use config::{ColumnLink, LayoutConfig};
pub use document::{DocumentAccess, SheetAccess};
pub use error::{DocumentError, LayoutError};
pub use event_tab::{copy_template_blocks, label_event_tabs, refresh_formulas, TabLabelSummary};
pub use locate::{locate_header, locate_label, AnchorMatch, HeaderLocation, SearchScope};
pub use merge_scan::first_unmerged_row;
pub use synth::{link_event_sheet, link_events, link_scoring_sheet, EventLink, LinkReport};
