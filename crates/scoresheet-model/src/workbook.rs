use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::worksheet::{parse_range, SnapshotError};
use crate::{CellValue, Range, Worksheet};

/// A workbook-scoped named range such as `Events` or `Team_Numbers`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedRange {
    pub sheet: String,
    pub range: Range,
}

impl NamedRange {
    /// Parse a sheet-qualified reference like `Setup!A2:A30` or `'Blank Score Sheet'!B3`.
    fn parse(name: &str, reference: &str) -> Result<Self, SnapshotError> {
        let Some((sheet, range)) = reference.rsplit_once('!') else {
            return Err(SnapshotError::UnknownSheet {
                name: name.to_string(),
                sheet: String::new(),
            });
        };
        let sheet = sheet
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .map(|s| s.replace("''", "'"))
            .unwrap_or_else(|| sheet.to_string());
        Ok(Self {
            sheet,
            range: parse_range(range)?,
        })
    }

    fn to_reference(&self) -> String {
        let needs_quotes = self
            .sheet
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        if needs_quotes {
            format!("'{}'!{}", self.sheet.replace('\'', "''"), self.range)
        } else {
            format!("{}!{}", self.sheet, self.range)
        }
    }
}

/// An in-memory spreadsheet document.
///
/// `reference` is the identifier other documents use to import from this one (the URL on
/// the hosting platform).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkbookSnapshot", into = "WorkbookSnapshot")]
pub struct Workbook {
    reference: String,
    sheets: Vec<Worksheet>,
    names: BTreeMap<String, NamedRange>,
}

impl Workbook {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            sheets: Vec::new(),
            names: BTreeMap::new(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    /// Add an empty sheet, or return the existing sheet with that name.
    pub fn add_sheet(&mut self, name: &str) -> &mut Worksheet {
        let idx = match self.sheet_index(name) {
            Some(idx) => idx,
            None => {
                self.sheets.push(Worksheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }

    /// Look up a sheet by name (case-insensitive, like the hosting platform).
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|idx| &self.sheets[idx])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let idx = self.sheet_index(name)?;
        self.sheets.get_mut(idx)
    }

    fn sheet_index(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name().to_lowercase() == wanted)
    }

    pub fn define_name(&mut self, name: impl Into<String>, sheet: impl Into<String>, range: Range) {
        self.names.insert(
            name.into(),
            NamedRange {
                sheet: sheet.into(),
                range,
            },
        );
    }

    pub fn named_range(&self, name: &str) -> Option<&NamedRange> {
        self.names.get(name)
    }

    /// Values of a named range as rows of cells, or `None` if the name (or its sheet)
    /// does not exist.
    pub fn named_values(&self, name: &str) -> Option<Vec<Vec<CellValue>>> {
        let named = self.names.get(name)?;
        let sheet = self.sheet(&named.sheet)?;
        Some(sheet.values(named.range))
    }

    /// The single (top-left) value of a named range.
    pub fn named_value(&self, name: &str) -> Option<CellValue> {
        let named = self.names.get(name)?;
        let sheet = self.sheet(&named.sheet)?;
        Some(sheet.value(named.range.start))
    }
}

/// JSON-friendly workbook layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkbookSnapshot {
    pub reference: String,
    #[serde(default)]
    pub sheets: Vec<Worksheet>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,
}

impl TryFrom<WorkbookSnapshot> for Workbook {
    type Error = SnapshotError;

    fn try_from(snapshot: WorkbookSnapshot) -> Result<Self, Self::Error> {
        let mut workbook = Workbook::new(snapshot.reference);
        for sheet in snapshot.sheets {
            if workbook.sheet(sheet.name()).is_some() {
                return Err(SnapshotError::DuplicateSheet(sheet.name().to_string()));
            }
            workbook.sheets.push(sheet);
        }
        for (name, reference) in snapshot.names {
            let named = NamedRange::parse(&name, &reference)?;
            if workbook.sheet(&named.sheet).is_none() {
                return Err(SnapshotError::UnknownSheet {
                    name,
                    sheet: named.sheet,
                });
            }
            workbook.names.insert(name, named);
        }
        Ok(workbook)
    }
}

impl From<Workbook> for WorkbookSnapshot {
    fn from(workbook: Workbook) -> Self {
        WorkbookSnapshot {
            reference: workbook.reference,
            sheets: workbook.sheets,
            names: workbook
                .names
                .iter()
                .map(|(name, named)| (name.clone(), named.to_reference()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellRef;

    #[test]
    fn sheet_lookup_ignores_case() {
        let mut wb = Workbook::new("doc://master");
        wb.add_sheet("Scoring");
        assert!(wb.sheet("scoring").is_some());
        assert!(wb.sheet("Sheet1").is_none());

        // Adding an existing name returns the same sheet.
        wb.add_sheet("SCORING");
        assert_eq!(wb.sheets().len(), 1);
    }

    #[test]
    fn quoted_sheet_names_parse() {
        let named = NamedRange::parse("Team_Numbers", "'Blank Score Sheet'!A3:A105").unwrap();
        assert_eq!(named.sheet, "Blank Score Sheet");
        assert_eq!(named.range.start, CellRef::new(3, 1));
        assert_eq!(named.to_reference(), "'Blank Score Sheet'!A3:A105");
    }

    #[test]
    fn named_values_read_through_sheet() {
        let mut wb = Workbook::new("doc://master");
        let setup = wb.add_sheet("Setup");
        setup.set_value(CellRef::new(2, 1), "Anatomy");
        setup.set_value(CellRef::new(3, 1), "Codebusters");
        wb.define_name("Events", "Setup", Range::from_a1("A2:A4").unwrap());

        let values = wb.named_values("Events").unwrap();
        assert_eq!(
            values,
            vec![
                vec![CellValue::from("Anatomy")],
                vec![CellValue::from("Codebusters")],
                vec![CellValue::Empty],
            ]
        );
        assert_eq!(wb.named_value("Events"), Some(CellValue::from("Anatomy")));
        assert!(wb.named_values("Missing").is_none());
    }
}
