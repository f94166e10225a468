use serde::Serialize;

use super::record::CollectionRecord;
use crate::identity::VariantKey;

// ---------------------------------------------------------------------------
// PackCard — One drawn slot, tagged with its transient flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackCard {
    pub key: VariantKey,
    /// Snapshot of the ledger record after this slot was committed.
    pub record: CollectionRecord,
    pub is_new: bool,
    pub is_bonus: bool,
    pub is_secret: bool,
    pub is_god_pack: bool,
}

// ---------------------------------------------------------------------------
// PackResult — Ordered result of one successful open
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    pub set_code: String,
    pub cards: Vec<PackCard>,
    pub is_god_pack: bool,
    /// Whether the bonus gate fired, which is what unlocks the secret gate.
    pub got_bonus: bool,
    pub points_spent: u32,
}

impl PackResult {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn new_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_new).count()
    }
}

// ---------------------------------------------------------------------------
// PackOutcome — Result of an open-pack request
// ---------------------------------------------------------------------------

/// Refusing a pack is an expected outcome, so it is a value rather than an error.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PackOutcome {
    Opened(PackResult),
    InsufficientFunds { points: u32, cost: u32 },
}

impl PackOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, PackOutcome::Opened(_))
    }

    pub fn pack(&self) -> Option<&PackResult> {
        match self {
            PackOutcome::Opened(pack) => Some(pack),
            PackOutcome::InsufficientFunds { .. } => None,
        }
    }

    pub fn into_pack(self) -> Option<PackResult> {
        match self {
            PackOutcome::Opened(pack) => Some(pack),
            PackOutcome::InsufficientFunds { .. } => None,
        }
    }
}
