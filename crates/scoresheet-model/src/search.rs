//! Text search over cell display text.
//!
//! Matching follows the hosting platform's find behavior: case-insensitive by default,
//! substring unless `match_entire_cell` is set, results in row-major order.

/// Options controlling how [`crate::Worksheet::find_all`] compares cell text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Compare case-sensitively.
    pub match_case: bool,
    /// Require the whole cell text to equal the needle (ignoring surrounding whitespace).
    pub match_entire_cell: bool,
}

impl FindOptions {
    /// Case-insensitive substring search.
    pub const fn substring() -> Self {
        Self {
            match_case: false,
            match_entire_cell: false,
        }
    }

    /// Case-insensitive whole-cell search.
    pub const fn entire_cell() -> Self {
        Self {
            match_case: false,
            match_entire_cell: true,
        }
    }

    /// Returns true if `text` matches `needle` under these options.
    pub fn matches(&self, text: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        if self.match_case {
            self.compare(text, needle)
        } else {
            self.compare(&text.to_lowercase(), &needle.to_lowercase())
        }
    }

    /// Whole-cell mode trims both `text` and `needle` before comparing.
    fn compare(&self, text: &str, needle: &str) -> bool {
        if self.match_entire_cell {
            text.trim() == needle.trim()
        } else {
            text.contains(needle)
        }
    }
}
