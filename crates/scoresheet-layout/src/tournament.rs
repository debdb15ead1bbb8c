//! Tournament identity and the names derived from it.
//!
//! The master spreadsheet carries the tournament details in named ranges. Blank cells
//! and the template's placeholder text both count as "not entered yet".

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use scoresheet_model::CellValue;

use crate::DocumentAccess;

pub const EVENTS_RANGE: &str = "Events";
pub const NAME_RANGE: &str = "TournamentName";
pub const DATE_RANGE: &str = "TournamentDate";
pub const DIVISION_RANGE: &str = "Division";
pub const LOCATION_RANGE: &str = "Location";

/// The template's default date; seeing it means no date was entered.
const PLACEHOLDER_DATE: (i32, u32, u32) = (2000, 1, 1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("named range `{0}` does not exist")]
    MissingRange(&'static str),
    #[error("no value has been entered for `{0}`")]
    Unset(&'static str),
    #[error("`{value}` is not a date")]
    InvalidDate { value: String },
}

/// Event names listed in the `Events` range, blanks removed, in sheet order.
pub fn event_names<D: DocumentAccess>(doc: &D) -> Result<Vec<String>, TournamentError> {
    let values = doc
        .named_values(EVENTS_RANGE)
        .ok_or(TournamentError::MissingRange(EVENTS_RANGE))?;
    Ok(values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_blank())
        .map(|v| v.to_string())
        .collect())
}

/// Template files belonging to an event: those whose name contains the event name.
pub fn template_files_for_event<'a>(event_name: &str, files: &'a [String]) -> Vec<&'a str> {
    files
        .iter()
        .map(String::as_str)
        .filter(|name| name.contains(event_name))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentInfo {
    pub name: String,
    pub date: NaiveDate,
    pub division: String,
    pub location: String,
}

impl TournamentInfo {
    pub fn from_document<D: DocumentAccess>(doc: &D) -> Result<Self, TournamentError> {
        let name = text_field(doc, NAME_RANGE, "Tournament Name")?;
        let date = date_field(doc)?;
        let division = text_field(doc, DIVISION_RANGE, "__")?;
        let location = text_field(doc, LOCATION_RANGE, "School_Name")?;
        Ok(Self {
            name,
            date,
            division,
            location,
        })
    }

    /// `<d-Month-yyyy> <name> Division-<division> @ <location>`.
    pub fn full_name(&self) -> String {
        format!(
            "{} {} Division-{} @ {}",
            self.date.format("%-d-%B-%Y"),
            self.name,
            self.division,
            self.location
        )
    }

    pub fn score_sheets_folder_name(&self) -> String {
        format!("{} - Event Specific Score Sheets", self.full_name())
    }

    pub fn template_folder_name(&self) -> String {
        format!("{} - Template Files", self.full_name())
    }

    /// Name of an event's scoring spreadsheet and of the folder holding it.
    pub fn event_spreadsheet_name(&self, event_name: &str) -> String {
        format!("{event_name} Event Scoring - {}", self.full_name())
    }

    /// Name given to an event's copied grading scoresheet.
    pub fn grading_scoresheet_name(&self, event_name: &str) -> String {
        format!(
            "{}: {event_name} - Scoresheet (Use this for grading)",
            self.full_name()
        )
    }
}

fn first_value<D: DocumentAccess>(
    doc: &D,
    range: &'static str,
) -> Result<CellValue, TournamentError> {
    let values = doc
        .named_values(range)
        .ok_or(TournamentError::MissingRange(range))?;
    Ok(values
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .unwrap_or_default())
}

fn text_field<D: DocumentAccess>(
    doc: &D,
    range: &'static str,
    placeholder: &str,
) -> Result<String, TournamentError> {
    let text = first_value(doc, range)?.to_string();
    let text = text.trim();
    if text.is_empty() || text == placeholder {
        return Err(TournamentError::Unset(range));
    }
    Ok(text.to_string())
}

fn date_field<D: DocumentAccess>(doc: &D) -> Result<NaiveDate, TournamentError> {
    let date = match first_value(doc, DATE_RANGE)? {
        CellValue::Empty => return Err(TournamentError::Unset(DATE_RANGE)),
        CellValue::Number(serial) => serial_to_date(serial),
        CellValue::String(s) if s.trim().is_empty() => {
            return Err(TournamentError::Unset(DATE_RANGE))
        }
        CellValue::String(s) => parse_date(s.trim()),
        CellValue::Boolean(b) => Err(TournamentError::InvalidDate {
            value: CellValue::Boolean(b).to_string(),
        }),
    }?;

    let (y, m, d) = PLACEHOLDER_DATE;
    if NaiveDate::from_ymd_opt(y, m, d) == Some(date) {
        return Err(TournamentError::Unset(DATE_RANGE));
    }
    Ok(date)
}

/// Spreadsheet serial day number (day 0 is 1899-12-30).
fn serial_to_date(serial: f64) -> Result<NaiveDate, TournamentError> {
    let invalid = || TournamentError::InvalidDate {
        value: CellValue::Number(serial).to_string(),
    };
    // 2958465 is 9999-12-31, the last representable spreadsheet date.
    if !serial.is_finite() || !(0.0..=2_958_465.0).contains(&serial) {
        return Err(invalid());
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).ok_or_else(invalid)?;
    epoch
        .checked_add_signed(Duration::days(serial.trunc() as i64))
        .ok_or_else(invalid)
}

fn parse_date(s: &str) -> Result<NaiveDate, TournamentError> {
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TournamentError::InvalidDate {
            value: s.to_string(),
        })
}
