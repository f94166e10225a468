//! In-memory collection state and its persisted document form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::history::RecencyHistory;
use crate::identity::VariantKey;
use crate::ledger::{CollectionLedger, SetRecords};
use crate::migrate::CURRENT_SCHEMA_VERSION;
use crate::models::CollectionRecord;
use crate::points::PointsAccount;

/// Ledger, points and history: everything a pack open mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState {
    pub ledger: CollectionLedger,
    pub points: PointsAccount,
    pub history: RecencyHistory,
}

impl CollectionState {
    /// Fresh state: an empty ledger and history, and `starting_points` to spend.
    pub fn new(starting_points: u32, now_ms: i64) -> Self {
        Self {
            ledger: CollectionLedger::new(),
            points: PointsAccount::new(starting_points, now_ms),
            history: RecencyHistory::new(),
        }
    }

    /// Snapshot the state in its persisted form at the current schema version.
    pub fn to_document(&self) -> SaveDocument {
        SaveDocument {
            schema_version: CURRENT_SCHEMA_VERSION,
            points: self.points.points,
            last_regen_timestamp: self.points.last_regen_timestamp,
            cards: self.ledger.clone(),
            last_pack: self.history.most_recent().map(|s| s.to_string()),
            recent_packs: self.history.entries().to_vec(),
        }
    }

    /// Decode a migrated document, dropping records that still fail to parse.
    ///
    /// Returns the state and the number of records dropped.
    pub fn from_document(doc: &Value, starting_points: u32, now_ms: i64) -> (Self, usize) {
        let points = doc
            .get("points")
            .and_then(|v| v.as_u64())
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(starting_points);
        let last_regen = doc
            .get("lastRegenTimestamp")
            .and_then(|v| v.as_i64())
            .unwrap_or(now_ms);

        let history = doc
            .get("recentPacks")
            .and_then(|v| v.as_array())
            .map(|arr| RecencyHistory::from_entries(arr.iter().filter_map(|v| v.as_str())))
            .unwrap_or_default();

        let mut ledger = CollectionLedger::new();
        let mut dropped = 0;
        if let Some(sets) = doc.get("cards").and_then(|v| v.as_object()) {
            for (set_code, records) in sets {
                let Some(records) = records.as_object() else {
                    tracing::warn!(set = %set_code, "Dropping set with non-object record map");
                    dropped += 1;
                    continue;
                };
                let mut decoded = SetRecords::new();
                for (raw_key, raw_record) in records {
                    let key = match VariantKey::parse(raw_key) {
                        Ok(key) => key,
                        Err(e) => {
                            tracing::warn!(set = %set_code, key = %raw_key, error = %e, "Dropping record with unreadable key");
                            dropped += 1;
                            continue;
                        }
                    };
                    match serde_json::from_value::<CollectionRecord>(raw_record.clone()) {
                        Ok(record) => {
                            decoded.insert(key, record);
                        }
                        Err(e) => {
                            tracing::warn!(set = %set_code, key = %raw_key, error = %e, "Dropping malformed record");
                            dropped += 1;
                        }
                    }
                }
                if !decoded.is_empty() {
                    ledger.insert_set(set_code.clone(), decoded);
                }
            }
        }

        let state = Self {
            ledger,
            points: PointsAccount {
                points,
                last_regen_timestamp: last_regen,
            },
            history,
        };
        (state, dropped)
    }
}

// ---------------------------------------------------------------------------
// SaveDocument — The single persisted JSON document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    pub schema_version: u32,
    pub points: u32,
    pub last_regen_timestamp: i64,
    pub cards: CollectionLedger,
    /// Mirror of the front of `recent_packs` for readers that predate it.
    pub last_pack: Option<String>,
    pub recent_packs: Vec<String>,
}
