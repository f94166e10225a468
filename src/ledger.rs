//! Per-set ownership ledger.
//!
//! Maps set code to variant key to [`CollectionRecord`]. A record exists if
//! and only if its variant has been acquired at least once; records are only
//! removed by the explicit `clear_*` operations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::identity::VariantKey;
use crate::models::CollectionRecord;

pub type SetRecords = BTreeMap<VariantKey, CollectionRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionLedger {
    sets: BTreeMap<String, SetRecords>,
}

impl CollectionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one acquisition of `key`.
    ///
    /// Inserts `seed` with `count` 1 on first touch, otherwise bumps the
    /// existing count. Returns the post-increment record.
    pub fn increment(
        &mut self,
        set_code: &str,
        key: VariantKey,
        seed: CollectionRecord,
    ) -> &CollectionRecord {
        let records = self.sets.entry(set_code.to_string()).or_default();
        records
            .entry(key)
            .and_modify(|r| r.count = r.count.saturating_add(1))
            .or_insert_with(|| CollectionRecord { count: 1, ..seed })
    }

    /// Look up the record for one variant of a set.
    pub fn get(&self, set_code: &str, key: &VariantKey) -> Option<&CollectionRecord> {
        self.sets.get(set_code).and_then(|records| records.get(key))
    }

    /// All records of a set, keyed by variant.
    pub fn get_all(&self, set_code: &str) -> Option<&SetRecords> {
        self.sets.get(set_code)
    }

    /// Records of a set ordered by numeric collector number, then by key.
    pub fn sorted_records(&self, set_code: &str) -> Vec<(&VariantKey, &CollectionRecord)> {
        let mut records: Vec<_> = self
            .sets
            .get(set_code)
            .map(|r| r.iter().collect())
            .unwrap_or_default();
        records.sort_by(|(ka, a), (kb, b)| {
            a.collector_sort_key()
                .cmp(&b.collector_sort_key())
                .then_with(|| ka.cmp(kb))
        });
        records
    }

    /// Sum of counts across a set, duplicates included.
    pub fn total_count(&self, set_code: &str) -> u64 {
        self.sets
            .get(set_code)
            .map(|records| records.values().map(|r| u64::from(r.count)).sum())
            .unwrap_or(0)
    }

    /// Number of distinct card names among records matching `predicate`.
    pub fn unique_count<F>(&self, set_code: &str, predicate: F) -> usize
    where
        F: Fn(&VariantKey, &CollectionRecord) -> bool,
    {
        let Some(records) = self.sets.get(set_code) else {
            return 0;
        };
        records
            .iter()
            .filter(|(key, record)| predicate(key, record))
            .map(|(_, record)| record.name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distinct regular cards owned, ignoring full-art and masterpiece copies.
    pub fn unique_regular_count(&self, set_code: &str) -> usize {
        self.unique_count(set_code, |_, record| record.is_regular())
    }

    /// Number of ledger entries (variants) held for a set.
    pub fn variant_count(&self, set_code: &str) -> usize {
        self.sets.get(set_code).map(|r| r.len()).unwrap_or(0)
    }

    /// Codes of every set with at least one record map.
    pub fn set_codes(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(|s| s.as_str())
    }

    /// Remove every record of a set. Returns whether the set was present.
    pub fn clear_set(&mut self, set_code: &str) -> bool {
        self.sets.remove(set_code).is_some()
    }

    /// Remove every record of every set.
    pub fn clear_all(&mut self) {
        self.sets.clear();
    }

    /// Whether no set holds any record.
    pub fn is_empty(&self) -> bool {
        self.sets.values().all(|r| r.is_empty())
    }

    pub(crate) fn insert_set(&mut self, set_code: String, records: SetRecords) {
        self.sets.insert(set_code, records);
    }
}
