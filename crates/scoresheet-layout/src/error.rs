use thiserror::Error;

/// Errors raised by a document collaborator while writing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("sheet `{0}` does not exist in the document")]
    SheetNotFound(String),
}

/// Fatal layout errors.
///
/// A label or marker that cannot be found is *not* an error: locators return `None` and
/// the synthesizer skips that column. Only conditions that make the whole operation
/// meaningless surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("sheet `{0}` not found")]
    SheetNotFound(String),
    #[error("named range `{0}` not found")]
    NamedRangeNotFound(String),
    #[error("no unmerged row below {column}{start_row} on sheet `{sheet}` within {limit} rows")]
    ScanLimitExceeded {
        sheet: String,
        /// Column label of the header being resolved.
        column: String,
        start_row: u32,
        limit: u32,
    },
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}
