//! Save document migration tests.

use booster_vault::config;
use booster_vault::migrate::{MigrationContext, SchemaMigrator, CURRENT_SCHEMA_VERSION};
use serde_json::{json, Value};

fn migrator() -> SchemaMigrator {
    SchemaMigrator::new(MigrationContext {
        starting_points: 24,
        now_ms: 5_000,
    })
}

fn legacy_document() -> Value {
    json!({
        "points": 10,
        "lastRegenTimestamp": 1_000,
        "lastPack": "sv1",
        "cards": {
            "sv1": {
                "c1": {
                    "name": "Bulbasaur",
                    "rarity": "common",
                    "frontImage": "c1.png",
                    "backImage": "back.png",
                    "count": 3,
                    "isFullArt": false,
                    "isMasterpiece": false,
                    "isSpotlight": true,
                    "collectorNumber": "1"
                },
                "c1_fullart": {
                    "name": "Bulbasaur",
                    "frontImage": "c1-fa.png",
                    "count": "lots"
                }
            }
        }
    })
}

#[test]
fn legacy_document_is_brought_to_current_version() {
    let mut doc = legacy_document();
    let report = migrator().migrate(&mut doc);

    assert_eq!(report.from_version, 0);
    assert_eq!(report.to_version, CURRENT_SCHEMA_VERSION);
    assert!(report.changed());
    assert!(report.skipped.is_empty());
    assert_eq!(doc["schemaVersion"], CURRENT_SCHEMA_VERSION);
    assert_eq!(doc["recentPacks"], json!(["sv1"]));
    assert_eq!(doc["points"], 10);

    let records = &doc["cards"]["sv1"];
    assert!(records.get("c1").is_none());
    assert_eq!(records["regular:c1"]["count"], 3);
    assert_eq!(records["regular:c1"]["isSpotlight"], true);

    let full_art = &records["fullart:c1"];
    assert_eq!(full_art["isFullArt"], true);
    assert_eq!(full_art["isMasterpiece"], false);
    assert_eq!(full_art["count"], 1);
    assert_eq!(full_art["backImage"], config::CARD_BACK_PLACEHOLDER);
    assert_eq!(full_art["rarity"], "common");
    assert_eq!(full_art["collectorNumber"], "");
}

#[test]
fn second_pass_makes_no_changes() {
    let mut doc = legacy_document();
    migrator().migrate(&mut doc);
    let snapshot = doc.clone();

    let report = migrator().migrate(&mut doc);
    assert_eq!(report.changes, 0);
    assert_eq!(doc, snapshot);

    // Even the unconditional repair pass finds nothing left to fix.
    let report = migrator().repair(&mut doc);
    assert_eq!(report.changes, 0);
    assert_eq!(doc, snapshot);
}

#[test]
fn empty_document_gets_containers_and_defaults() {
    let mut doc = json!({});
    migrator().migrate(&mut doc);

    assert_eq!(doc["cards"], json!({}));
    assert_eq!(doc["recentPacks"], json!([]));
    assert_eq!(doc["lastPack"], Value::Null);
    assert_eq!(doc["points"], 24);
    assert_eq!(doc["lastRegenTimestamp"], 5_000);
}

#[test]
fn existing_history_is_not_reseeded_from_last_pack() {
    let mut doc = json!({ "lastPack": "old", "recentPacks": ["a", "b"] });
    migrator().migrate(&mut doc);
    assert_eq!(doc["recentPacks"], json!(["a", "b"]));
}

#[test]
fn non_object_root_is_replaced() {
    let mut doc = json!("garbage");
    let report = migrator().migrate(&mut doc);
    assert!(doc.is_object());
    assert_eq!(report.skipped, vec!["$".to_string()]);
}

#[test]
fn malformed_records_are_skipped_and_others_migrate() {
    let mut doc = json!({
        "cards": {
            "sv1": {
                "bad": 42,
                "good": { "name": "Oddish", "count": 2 }
            },
            "sv2": "not a map"
        }
    });
    let report = migrator().migrate(&mut doc);

    assert!(report.skipped.contains(&"cards.sv1.bad".to_string()));
    assert!(report.skipped.contains(&"cards.sv2".to_string()));
    assert_eq!(doc["cards"]["sv1"]["regular:good"]["count"], 2);
    assert_eq!(doc["cards"]["sv1"]["regular:good"]["backImage"], config::CARD_BACK_PLACEHOLDER);
}

#[test]
fn numeric_coercions() {
    let mut doc = json!({
        "points": 7.9,
        "cards": {
            "sv1": {
                "a": { "name": "A", "count": 0, "collectorNumber": 12 },
                "b": { "name": "B", "count": 2.5 }
            }
        }
    });
    migrator().migrate(&mut doc);

    assert_eq!(doc["points"], 7);
    assert_eq!(doc["cards"]["sv1"]["regular:a"]["count"], 1);
    assert_eq!(doc["cards"]["sv1"]["regular:a"]["collectorNumber"], "12");
    assert_eq!(doc["cards"]["sv1"]["regular:b"]["count"], 2);
}

#[test]
fn colliding_legacy_keys_merge_counts() {
    let mut doc = json!({
        "cards": {
            "sv1": {
                "c1": { "name": "Bulbasaur", "isFullArt": true, "count": 2 },
                "c1_fullart": { "name": "Bulbasaur", "count": 3 }
            }
        }
    });
    migrator().migrate(&mut doc);

    let records = doc["cards"]["sv1"].as_object().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records["fullart:c1"]["count"], 5);
}

#[test]
fn legacy_masterpiece_suffix_sets_flag() {
    let mut doc = json!({
        "cards": { "sv1": { "m1_masterpiece": { "name": "Mew" } } }
    });
    migrator().migrate(&mut doc);

    let record = &doc["cards"]["sv1"]["masterpiece:m1"];
    assert_eq!(record["isMasterpiece"], true);
    assert_eq!(record["isFullArt"], false);
}

#[test]
fn newer_documents_are_left_alone() {
    let mut doc = json!({ "schemaVersion": CURRENT_SCHEMA_VERSION + 1 });
    let snapshot = doc.clone();
    let report = migrator().migrate(&mut doc);
    assert_eq!(report.changes, 0);
    assert_eq!(doc, snapshot);
}
