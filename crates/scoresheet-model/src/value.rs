use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell value as it appears in a scoresheet snapshot.
///
/// Snapshots are hand-edited JSON, so the representation is untagged: a JSON string,
/// number, or boolean maps directly onto the matching variant and `null` is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty / unset cell value.
    #[default]
    Empty,
    /// Boolean.
    Boolean(bool),
    /// IEEE-754 double precision number.
    Number(f64),
    /// Plain string.
    String(String),
}

impl CellValue {
    /// Returns true if the value is [`CellValue::Empty`] or an empty string.
    ///
    /// Named-range filtering treats both as blank, the same way the grid does.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            // Whole numbers render without a fractional part, like the grid does.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_grid_text() {
        assert_eq!(CellValue::Number(12.0).to_string(), "12");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from("Team #").to_string(), "Team #");
    }

    #[test]
    fn untagged_json_maps_onto_variants() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[null, "Score", 3, true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Empty,
                CellValue::String("Score".into()),
                CellValue::Number(3.0),
                CellValue::Boolean(true),
            ]
        );
    }
}
