//! Property tests for totals, search and deletion.

use proptest::prelude::*;
use visit_ledger::{filter_records, Ledger, VisitDraft, VisitorDetails};

fn details(name: String) -> VisitorDetails {
    VisitorDetails {
        entity_name: "Glow".to_string(),
        date: "4/2/2024".parse().unwrap(),
        name,
        number: "555".to_string(),
        address: String::new(),
    }
}

fn filled_ledger(names: &[String]) -> Ledger {
    let ledger = Ledger::in_memory();
    for name in names {
        let mut draft = VisitDraft::begin(details(name.clone()));
        draft.add_service("Cut", 10.0);
        draft.compute_total();
        ledger.commit(draft).unwrap();
    }
    ledger
}

proptest! {
    #[test]
    fn valid_service_adds_exactly_its_charge(
        existing in prop::collection::vec(1u32..10_000, 0..8),
        charge in 1u32..10_000,
    ) {
        let mut draft = VisitDraft::begin(details("A".to_string()));
        for c in &existing {
            draft.add_service("Existing", f64::from(*c));
        }
        let before = draft.compute_total().grand_total;

        prop_assert!(draft.add_service("New", f64::from(charge)));
        let after = draft.compute_total().grand_total;
        prop_assert_eq!(after, before + f64::from(charge));
    }

    #[test]
    fn invalid_service_leaves_totals_unchanged(
        existing in prop::collection::vec(1u32..10_000, 0..8),
        charge in -10_000i32..=0,
        named in any::<bool>(),
    ) {
        let mut draft = VisitDraft::begin(details("A".to_string()));
        for c in &existing {
            draft.add_service("Existing", f64::from(*c));
        }
        let before = draft.compute_total();

        let name = if named { "Wash" } else { "" };
        prop_assert!(!draft.add_service(name, f64::from(charge)));
        prop_assert!(!draft.add_service("", 50.0));
        prop_assert_eq!(draft.compute_total(), before);
    }

    #[test]
    fn final_total_is_grand_total_minus_discount(
        charges in prop::collection::vec(1u32..10_000, 0..8),
        discount in -1_000i32..50_000,
    ) {
        let mut draft = VisitDraft::begin(details("A".to_string()));
        for c in &charges {
            draft.add_service("Service", f64::from(*c));
        }
        draft.set_discount(f64::from(discount));

        let totals = draft.compute_total();
        prop_assert_eq!(totals.final_total, totals.grand_total - f64::from(discount));
    }

    #[test]
    fn empty_search_is_whole_ledger(names in prop::collection::vec("[a-zA-Z ]{0,12}", 0..10)) {
        let ledger = filled_ledger(&names);
        prop_assert_eq!(ledger.search(""), ledger.records());

        let records = ledger.records();
        let indices: Vec<usize> = filter_records(&records, "").iter().map(|(i, _)| *i).collect();
        prop_assert_eq!(indices, (0..records.len()).collect::<Vec<_>>());
    }

    #[test]
    fn delete_removes_exactly_one(
        names in prop::collection::vec("[a-z]{1,8}", 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let ledger = filled_ledger(&names);
        let before = ledger.records();
        let index = pick.index(before.len());

        let removed = ledger.delete_at(index).unwrap();
        let after = ledger.records();

        prop_assert_eq!(&removed, &before[index]);
        prop_assert_eq!(after.len(), before.len() - 1);
        prop_assert_eq!(&after[..index], &before[..index]);
        prop_assert_eq!(&after[index..], &before[index + 1..]);
    }
}
