//! Command-line driver for the scoresheet linker.
//!
//! Documents are read from and written back to JSON workbook snapshots (see
//! [`scoresheet_model::WorkbookSnapshot`]).

pub mod cli;

pub use cli::{run, run_with_args, Args};
