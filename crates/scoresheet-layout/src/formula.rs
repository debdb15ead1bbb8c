//! Text of the cross-document lookup formulas.
//!
//! The shapes are fixed:
//!
//! ```text
//! =IMPORTRANGE("<source>", "<L><row>:<L><row + span>")
//! =IMPORTRANGE("<target>", "<Event>!<L>2:<L>104")
//! ```

use scoresheet_model::column_label;

/// `=IMPORTRANGE("<reference>", "<range>")`.
///
/// Double quotes inside either argument are doubled, the formula-language escape.
pub fn import_range_formula(reference: &str, range: &str) -> String {
    format!(
        "=IMPORTRANGE(\"{}\", \"{}\")",
        reference.replace('"', "\"\""),
        range.replace('"', "\"\"")
    )
}

/// A single-column A1 range from `first_row` down `span` more rows (`C6:C108`).
///
/// Returns `None` if the last row would overflow a `u32`.
pub fn column_span(col: u32, first_row: u32, span: u32) -> Option<String> {
    let last_row = first_row.checked_add(span)?;
    let label = column_label(col);
    Some(format!("{label}{first_row}:{label}{last_row}"))
}

/// A sheet-qualified single-column range (`Anatomy!C2:C104`).
///
/// The sheet name is emitted verbatim; event names are used as-is by the importing side.
pub fn sheet_column_range(sheet: &str, col: u32, first_row: u32, last_row: u32) -> String {
    let label = column_label(col);
    format!("{sheet}!{label}{first_row}:{label}{last_row}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_direction_formula_is_bit_exact() {
        let range = column_span(3, 6, 102).unwrap();
        assert_eq!(range, "C6:C108");
        assert_eq!(
            import_range_formula("https://docs.example.com/d/abc", &range),
            r#"=IMPORTRANGE("https://docs.example.com/d/abc", "C6:C108")"#
        );
    }

    #[test]
    fn reverse_direction_formula_is_bit_exact() {
        let range = sheet_column_range("Anatomy and Physiology", 4, 2, 104);
        assert_eq!(
            import_range_formula("https://docs.example.com/d/evt", &range),
            r#"=IMPORTRANGE("https://docs.example.com/d/evt", "Anatomy and Physiology!D2:D104")"#
        );
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(
            import_range_formula("a\"b", "A1"),
            r#"=IMPORTRANGE("a""b", "A1")"#
        );
    }

    #[test]
    fn wide_columns_use_multi_letter_labels() {
        assert_eq!(column_span(28, 10, 102).as_deref(), Some("AB10:AB112"));
    }

    #[test]
    fn span_past_u32_rows_is_rejected() {
        assert_eq!(column_span(3, 6, u32::MAX), None);
        assert_eq!(column_span(3, 1, u32::MAX - 1).as_deref(), Some("C1:C4294967295"));
    }
}
