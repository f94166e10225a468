use serde::{Deserialize, Serialize};

use super::card::CardCatalogEntry;
use crate::identity::VariantKind;

// ---------------------------------------------------------------------------
// CollectionRecord — One owned variant in the ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub name: String,
    pub rarity: String,
    pub front_image: String,
    pub back_image: String,
    pub count: u32,
    pub is_full_art: bool,
    pub is_masterpiece: bool,
    pub is_spotlight: bool,
    pub collector_number: String,
}

impl CollectionRecord {
    /// Seed record for a freshly drawn variant, with `count` 1.
    pub fn seed(entry: &CardCatalogEntry, kind: VariantKind, is_spotlight: bool) -> Self {
        Self {
            name: entry.name.clone(),
            rarity: entry.rarity.as_str().to_string(),
            front_image: entry.images.front.clone(),
            back_image: entry.images.back.clone(),
            count: 1,
            is_full_art: kind == VariantKind::FullArt,
            is_masterpiece: kind == VariantKind::Masterpiece,
            is_spotlight,
            collector_number: entry.number.clone(),
        }
    }

    /// Collector number as an integer for ordering; non-numeric sorts as 0.
    pub fn collector_sort_key(&self) -> u64 {
        self.collector_number.trim().parse().unwrap_or(0)
    }

    pub fn is_regular(&self) -> bool {
        !self.is_full_art && !self.is_masterpiece
    }
}
