use scoresheet_model::{CellRef, CellValue, MergeError, Range, Worksheet};

#[test]
fn merge_edit_unmerge_behaves_like_anchor_cell() {
    let mut sheet = Worksheet::new("Scoring");

    sheet.set_value(CellRef::new(3, 7), "Score");
    sheet.set_value(CellRef::new(4, 7), "drop");

    sheet
        .merge_range(Range::from_a1("G3:G5").unwrap())
        .expect("merge");

    // Only the top-left cell is stored.
    assert_eq!(sheet.iter_cells().count(), 1);
    assert_eq!(sheet.value(CellRef::new(5, 7)), CellValue::from("Score"));

    // Editing any cell inside a merge writes the anchor cell.
    sheet.set_value(CellRef::new(4, 7), "Final Score");
    assert_eq!(sheet.iter_cells().count(), 1);
    assert_eq!(
        sheet.value(CellRef::new(3, 7)),
        CellValue::from("Final Score")
    );

    // Unmerge enables independent cells again.
    assert_eq!(sheet.unmerge_range(Range::from_a1("G4").unwrap()), 1);
    sheet.set_value(CellRef::new(4, 7), "b");
    assert_eq!(sheet.iter_cells().count(), 2);
    assert_eq!(sheet.value(CellRef::new(4, 7)), CellValue::from("b"));
}

#[test]
fn overlapping_merge_leaves_sheet_untouched() {
    let mut sheet = Worksheet::new("Scoring");
    sheet
        .merge_range(Range::from_a1("F3:K3").unwrap())
        .unwrap();
    sheet.set_value(CellRef::new(4, 8), "keep");

    let err = sheet
        .merge_range(Range::from_a1("H3:H5").unwrap())
        .unwrap_err();
    assert!(matches!(err, MergeError::Overlap { .. }));
    assert_eq!(sheet.merged_regions().len(), 1);
    assert_eq!(sheet.value(CellRef::new(4, 8)), CellValue::from("keep"));
}

#[test]
fn search_skips_cells_hidden_by_a_merge() {
    let mut sheet = Worksheet::new("Scoring");
    sheet.set_value(CellRef::new(3, 7), "Tier");
    sheet
        .merge_range(Range::from_a1("G3:G5").unwrap())
        .unwrap();

    // The merged block is found once, at its anchor.
    let hits = sheet.find_all("Tier", scoresheet_model::FindOptions::entire_cell());
    assert_eq!(hits, vec![CellRef::new(3, 7)]);
}

#[test]
fn clearing_inside_a_merge_clears_the_anchor() {
    let mut sheet = Worksheet::new("Scoring");
    sheet.set_value(CellRef::new(2, 12), "Anatomy");
    sheet
        .merge_range(Range::from_a1("L2:O2").unwrap())
        .unwrap();

    sheet.clear_cell(CellRef::new(2, 14));
    assert_eq!(sheet.iter_cells().count(), 0);
    assert_eq!(sheet.value(CellRef::new(2, 12)), CellValue::Empty);
    assert_eq!(sheet.merged_regions().len(), 1);
}
