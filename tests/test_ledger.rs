//! Collection ledger mutation and aggregation tests.

mod common;

use booster_vault::identity::{VariantKey, VariantKind};
use booster_vault::models::{CollectionRecord, Rarity};
use booster_vault::CollectionLedger;

fn seed(id: &str, name: &str, kind: VariantKind, number: &str) -> (VariantKey, CollectionRecord) {
    let entry = common::card(id, name, Rarity::Common, number);
    (
        VariantKey::encode(id, kind),
        CollectionRecord::seed(&entry, kind, false),
    )
}

// ---------------------------------------------------------------------------
// increment
// ---------------------------------------------------------------------------

#[test]
fn first_increment_creates_record_with_count_one() {
    let mut ledger = CollectionLedger::new();
    let (key, record) = seed("c1", "Bulbasaur", VariantKind::Regular, "1");

    let stored = ledger.increment(common::SET, key.clone(), record);
    assert_eq!(stored.count, 1);
    assert_eq!(stored.name, "Bulbasaur");
    assert_eq!(ledger.get(common::SET, &key).unwrap().count, 1);
}

#[test]
fn repeated_increments_count_every_acquisition() {
    let mut ledger = CollectionLedger::new();
    let (key, record) = seed("c1", "Bulbasaur", VariantKind::Regular, "1");

    for _ in 0..7 {
        ledger.increment(common::SET, key.clone(), record.clone());
    }
    assert_eq!(ledger.get(common::SET, &key).unwrap().count, 7);
    assert_eq!(ledger.variant_count(common::SET), 1);
}

#[test]
fn later_seeds_do_not_overwrite_stored_fields() {
    let mut ledger = CollectionLedger::new();
    let (key, record) = seed("c1", "Bulbasaur", VariantKind::Regular, "1");
    ledger.increment(common::SET, key.clone(), record.clone());

    let renamed = CollectionRecord {
        name: "Renamed".into(),
        ..record
    };
    let stored = ledger.increment(common::SET, key, renamed);
    assert_eq!(stored.name, "Bulbasaur");
    assert_eq!(stored.count, 2);
}

#[test]
fn seed_flags_follow_variant_kind() {
    let entry = common::card("fa1", "Charizard", Rarity::Rare, "202");
    let full_art = CollectionRecord::seed(&entry, VariantKind::FullArt, false);
    assert!(full_art.is_full_art);
    assert!(!full_art.is_masterpiece);
    assert_eq!(full_art.rarity, "rare");
    assert_eq!(full_art.back_image, "img/back.png");

    let masterpiece = CollectionRecord::seed(&entry, VariantKind::Masterpiece, false);
    assert!(masterpiece.is_masterpiece);
    assert!(!masterpiece.is_regular());
}

// ---------------------------------------------------------------------------
// aggregation
// ---------------------------------------------------------------------------

fn populated() -> CollectionLedger {
    let mut ledger = CollectionLedger::new();
    for (id, name, kind, number, times) in [
        ("c1", "Bulbasaur", VariantKind::Regular, "1", 3),
        ("c1", "Bulbasaur", VariantKind::FullArt, "1", 1),
        ("r2", "Charizard", VariantKind::Regular, "6", 2),
        ("x9", "Energy", VariantKind::Regular, "E-1", 1),
        ("m1", "Mew", VariantKind::Masterpiece, "151", 1),
    ] {
        let (key, record) = seed(id, name, kind, number);
        for _ in 0..times {
            ledger.increment(common::SET, key.clone(), record.clone());
        }
    }
    ledger
}

#[test]
fn total_count_includes_duplicates_and_variants() {
    let ledger = populated();
    assert_eq!(ledger.total_count(common::SET), 8);
    assert_eq!(ledger.total_count("missing"), 0);
}

#[test]
fn unique_count_deduplicates_by_name() {
    let ledger = populated();
    // Bulbasaur is owned as regular and full-art but counts once.
    assert_eq!(ledger.unique_count(common::SET, |_, _| true), 4);
    assert_eq!(ledger.unique_regular_count(common::SET), 3);
    assert_eq!(
        ledger.unique_count(common::SET, |key, _| key.kind() == VariantKind::Masterpiece),
        1
    );
}

#[test]
fn sorted_records_order_numerically_with_non_numeric_first() {
    let ledger = populated();
    let sorted = ledger.sorted_records(common::SET);
    let numbers: Vec<&str> = sorted
        .iter()
        .map(|(_, r)| r.collector_number.as_str())
        .collect();
    // "E-1" parses as 0; "151" sorts after "6" numerically.
    assert_eq!(numbers, vec!["E-1", "1", "1", "6", "151"]);
}

#[test]
fn sorted_records_tie_break_on_key() {
    let ledger = populated();
    let sorted = ledger.sorted_records(common::SET);
    assert_eq!(sorted[1].0, &VariantKey::regular("c1"));
    assert_eq!(sorted[2].0, &VariantKey::full_art("c1"));
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

#[test]
fn clear_set_removes_only_that_set() {
    let mut ledger = populated();
    let (key, record) = seed("o1", "Oddish", VariantKind::Regular, "43");
    ledger.increment("other", key, record);

    assert!(ledger.clear_set(common::SET));
    assert!(ledger.get_all(common::SET).is_none());
    assert_eq!(ledger.total_count("other"), 1);
    assert!(!ledger.clear_set(common::SET));
}

#[test]
fn clear_all_empties_ledger() {
    let mut ledger = populated();
    ledger.clear_all();
    assert!(ledger.is_empty());
    assert_eq!(ledger.set_codes().count(), 0);
}
