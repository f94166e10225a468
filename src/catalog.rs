//! Per-set card pools consumed by the pack composer.
//!
//! The catalog is supplied from outside and stays immutable for a session.
//! Raw payloads are normalized on the way in (see
//! [`RawCatalogEntry::normalize`]) so the composer never inspects card shape.

use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, VaultError};
use crate::models::{CardCatalogEntry, RawCatalogEntry, Rarity};

/// The four card pools of one set, with the main pool indexed by rarity.
#[derive(Debug, Clone)]
pub struct SetCatalog {
    set_code: String,
    main: Vec<CardCatalogEntry>,
    full_art: Vec<CardCatalogEntry>,
    masterpiece: Vec<CardCatalogEntry>,
    spotlight: Vec<CardCatalogEntry>,
    spotlight_ids: HashSet<String>,
    /// Indices into `main`, one bucket per [`Rarity`].
    tiers: [Vec<usize>; 4],
}

impl SetCatalog {
    /// Build a catalog from already-separated pools.
    pub fn new(
        set_code: impl Into<String>,
        main: Vec<CardCatalogEntry>,
        full_art: Vec<CardCatalogEntry>,
        masterpiece: Vec<CardCatalogEntry>,
        spotlight: Vec<CardCatalogEntry>,
    ) -> Self {
        let mut tiers: [Vec<usize>; 4] = Default::default();
        for (idx, entry) in main.iter().enumerate() {
            tiers[entry.rarity.index()].push(idx);
        }
        let spotlight_ids = spotlight.iter().map(|e| e.id.clone()).collect();

        Self {
            set_code: set_code.into(),
            main,
            full_art,
            masterpiece,
            spotlight,
            spotlight_ids,
            tiers,
        }
    }

    /// Partition a flat entry list into pools by each entry's membership flags.
    ///
    /// Full-art and masterpiece sources are kept out of the main pool;
    /// spotlight cards stay in it and are also listed in the spotlight pool.
    pub fn from_entries(set_code: impl Into<String>, entries: Vec<CardCatalogEntry>) -> Self {
        let mut main = Vec::new();
        let mut full_art = Vec::new();
        let mut masterpiece = Vec::new();
        let mut spotlight = Vec::new();

        for entry in entries {
            if entry.is_spotlight {
                spotlight.push(entry.clone());
            }
            if entry.is_full_art_source {
                full_art.push(entry);
            } else if entry.is_masterpiece_source {
                masterpiece.push(entry);
            } else {
                main.push(entry);
            }
        }

        Self::new(set_code, main, full_art, masterpiece, spotlight)
    }

    /// Normalize raw payload entries, then partition them.
    pub fn from_raw(set_code: impl Into<String>, raw: Vec<RawCatalogEntry>) -> Self {
        let entries = raw.into_iter().map(RawCatalogEntry::normalize).collect();
        Self::from_entries(set_code, entries)
    }

    pub fn set_code(&self) -> &str {
        &self.set_code
    }

    /// Regular-slot pool.
    pub fn main(&self) -> &[CardCatalogEntry] {
        &self.main
    }

    /// Pool for god packs and the bonus slot.
    pub fn full_art(&self) -> &[CardCatalogEntry] {
        &self.full_art
    }

    /// Pool for the secret slot.
    pub fn masterpiece(&self) -> &[CardCatalogEntry] {
        &self.masterpiece
    }

    pub fn spotlight(&self) -> &[CardCatalogEntry] {
        &self.spotlight
    }

    /// Whether `entry` is listed in the spotlight pool.
    pub fn is_spotlight(&self, entry: &CardCatalogEntry) -> bool {
        self.spotlight_ids.contains(&entry.id)
    }

    /// Main-pool entries of one rarity tier.
    pub fn tier(&self, rarity: Rarity) -> impl Iterator<Item = &CardCatalogEntry> + '_ {
        self.tiers[rarity.index()].iter().map(|&idx| &self.main[idx])
    }

    /// Number of main-pool entries in one tier.
    pub fn tier_len(&self, rarity: Rarity) -> usize {
        self.tiers[rarity.index()].len()
    }

    pub(crate) fn tier_entry(&self, rarity: Rarity, position: usize) -> Option<&CardCatalogEntry> {
        self.tiers[rarity.index()]
            .get(position)
            .map(|&idx| &self.main[idx])
    }
}

/// Load a JSON array of raw catalog entries from disk.
///
/// Files ending in `.gz` are decompressed transparently.
pub fn load_catalog_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawCatalogEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(VaultError::NotFound(format!(
            "Catalog file {} does not exist",
            path.display()
        )));
    }

    let contents = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = fs::File::open(path)?;
        let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
        let mut contents = String::new();
        decoder.read_to_string(&mut contents)?;
        contents
    } else {
        fs::read_to_string(path)?
    };

    let value: serde_json::Value = serde_json::from_str(&contents)?;
    // Accept both a bare array and the `{ "data": [...] }` envelope.
    let array = match value {
        serde_json::Value::Array(arr) => arr,
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(arr)) => arr,
            _ => {
                return Err(VaultError::InvalidArgument(format!(
                    "Catalog file {} has no entry array",
                    path.display()
                )))
            }
        },
        _ => {
            return Err(VaultError::InvalidArgument(format!(
                "Catalog file {} has no entry array",
                path.display()
            )))
        }
    };

    let mut entries = Vec::with_capacity(array.len());
    for (idx, item) in array.into_iter().enumerate() {
        match serde_json::from_value::<RawCatalogEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "Skipping malformed catalog entry");
            }
        }
    }
    Ok(entries)
}
