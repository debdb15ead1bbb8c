use proptest::prelude::*;
use scoresheet_model::{column_index, column_label, CellRef, Range};

fn arb_range() -> impl Strategy<Value = Range> {
    (1u32..60, 1u32..60, 1u32..60, 1u32..60).prop_map(|(r1, c1, r2, c2)| {
        Range::new(CellRef::new(r1, c1), CellRef::new(r2, c2))
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn intersection_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn intersection_agrees_with_shared_cells(a in arb_range(), b in arb_range()) {
        let shares_cell = a.cells().any(|cell| b.contains(cell));
        prop_assert_eq!(a.intersects(&b), shares_cell);
    }

    #[test]
    fn column_labels_invert(col in 1u32..=18_278) {
        let label = column_label(col);
        prop_assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
        prop_assert_eq!(column_index(&label).unwrap(), col);
    }
}
