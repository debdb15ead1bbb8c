//! Narrow document interfaces consumed by the layout engine.
//!
//! The hosting platform (or the in-memory [`Workbook`]) is passed explicitly into every
//! core function; nothing reads an ambient "active spreadsheet".

use scoresheet_model::{CellRef, CellValue, FindOptions, Range, Workbook, Worksheet};

use crate::DocumentError;

/// Read access to a single sheet.
pub trait SheetAccess {
    fn name(&self) -> &str;

    /// Every cell matching `text`, in row-major order.
    fn find_all(&self, text: &str, options: FindOptions) -> Vec<CellRef>;

    /// The first cell matching `text`, in row-major order.
    fn find_next(&self, text: &str, options: FindOptions) -> Option<CellRef> {
        self.find_all(text, options).into_iter().next()
    }

    /// Merged regions that share at least one cell with `within`.
    ///
    /// Merge state is read live on every call.
    fn merged_regions(&self, within: Range) -> Vec<Range>;

    /// Display text of a cell.
    fn text(&self, cell: CellRef) -> String;

    /// Values of `range` as rows of cells.
    fn values(&self, range: Range) -> Vec<Vec<CellValue>>;

    /// Every formula inside `within`, in row-major order.
    fn formulas(&self, within: Range) -> Vec<(CellRef, String)>;
}

/// A spreadsheet document: named sheets, named ranges, and formula writes.
pub trait DocumentAccess {
    type Sheet: SheetAccess;

    /// Identifier other documents import from (the document URL).
    fn reference(&self) -> &str;

    fn sheet_by_name(&self, name: &str) -> Option<&Self::Sheet>;

    /// Sheet names in tab order.
    fn sheet_names(&self) -> Vec<String>;

    /// Values of a workbook-scoped named range, as rows.
    fn named_values(&self, name: &str) -> Option<Vec<Vec<CellValue>>>;

    fn set_formula(&mut self, sheet: &str, cell: CellRef, formula: &str)
        -> Result<(), DocumentError>;

    /// Write a block of values with its top-left corner at `origin`.
    fn set_values(
        &mut self,
        sheet: &str,
        origin: CellRef,
        values: &[Vec<CellValue>],
    ) -> Result<(), DocumentError>;

    /// The first sheet in tab order.
    fn first_sheet(&self) -> Option<&Self::Sheet> {
        let first = self.sheet_names().into_iter().next()?;
        self.sheet_by_name(&first)
    }
}

impl SheetAccess for Worksheet {
    fn name(&self) -> &str {
        Worksheet::name(self)
    }

    fn find_all(&self, text: &str, options: FindOptions) -> Vec<CellRef> {
        Worksheet::find_all(self, text, options)
    }

    fn find_next(&self, text: &str, options: FindOptions) -> Option<CellRef> {
        Worksheet::find_next(self, text, options)
    }

    fn merged_regions(&self, within: Range) -> Vec<Range> {
        Worksheet::merged_regions(self).intersecting(within).collect()
    }

    fn text(&self, cell: CellRef) -> String {
        self.value(cell).to_string()
    }

    fn values(&self, range: Range) -> Vec<Vec<CellValue>> {
        Worksheet::values(self, range)
    }

    fn formulas(&self, within: Range) -> Vec<(CellRef, String)> {
        self.iter_cells()
            .filter(|(cell, _)| within.contains(*cell))
            .filter_map(|(cell, stored)| Some((cell, stored.formula.clone()?)))
            .collect()
    }
}

impl DocumentAccess for Workbook {
    type Sheet = Worksheet;

    fn reference(&self) -> &str {
        Workbook::reference(self)
    }

    fn sheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet(name)
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets().iter().map(|s| s.name().to_string()).collect()
    }

    fn named_values(&self, name: &str) -> Option<Vec<Vec<CellValue>>> {
        Workbook::named_values(self, name)
    }

    fn set_formula(
        &mut self,
        sheet: &str,
        cell: CellRef,
        formula: &str,
    ) -> Result<(), DocumentError> {
        self.sheet_mut(sheet)
            .ok_or_else(|| DocumentError::SheetNotFound(sheet.to_string()))?
            .set_formula(cell, formula);
        Ok(())
    }

    fn set_values(
        &mut self,
        sheet: &str,
        origin: CellRef,
        values: &[Vec<CellValue>],
    ) -> Result<(), DocumentError> {
        self.sheet_mut(sheet)
            .ok_or_else(|| DocumentError::SheetNotFound(sheet.to_string()))?
            .set_values(origin, values);
        Ok(())
    }
}
