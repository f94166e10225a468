//! Roll-to-tier resolution and the shortage fallback chain.

use crate::catalog::SetCatalog;
use crate::config::TierThresholds;
use crate::models::Rarity;

/// Order tried when the rolled tier has no cards, regardless of which tier
/// was rolled.
pub const FALLBACK_ORDER: [Rarity; 4] = [
    Rarity::Common,
    Rarity::Uncommon,
    Rarity::Rare,
    Rarity::Mythic,
];

/// Every tier pool of the set is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no cards available in any rarity tier")]
pub struct NoCardsAvailable;

/// Maps uniform rolls to rarity tiers using a set of [`TierThresholds`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RarityResolver {
    thresholds: TierThresholds,
}

impl RarityResolver {
    /// Create a resolver for the given thresholds.
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds this resolver was built with.
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Map a roll in `[0, 100)` to a tier.
    ///
    /// Thresholds are exclusive upper bounds, so a roll landing exactly on one
    /// belongs to the next, less rare tier.
    pub fn resolve(&self, roll: f64) -> Rarity {
        let t = &self.thresholds;
        if roll < t.mythic {
            Rarity::Mythic
        } else if roll < t.rare {
            Rarity::Rare
        } else if roll < t.uncommon {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }

    /// Resolve a roll, then degrade to the first non-empty tier if needed.
    pub fn resolve_available<F>(&self, roll: f64, is_empty: F) -> Result<Rarity, NoCardsAvailable>
    where
        F: Fn(Rarity) -> bool,
    {
        fallback(self.resolve(roll), is_empty)
    }

    /// Resolve a roll against the main-pool tiers of `catalog`.
    pub fn resolve_in(&self, roll: f64, catalog: &SetCatalog) -> Result<Rarity, NoCardsAvailable> {
        self.resolve_available(roll, |r| catalog.tier_len(r) == 0)
    }
}

/// Keep `rolled` if its pool has cards, else walk [`FALLBACK_ORDER`].
pub fn fallback<F>(rolled: Rarity, is_empty: F) -> Result<Rarity, NoCardsAvailable>
where
    F: Fn(Rarity) -> bool,
{
    if !is_empty(rolled) {
        return Ok(rolled);
    }
    FALLBACK_ORDER
        .iter()
        .copied()
        .filter(|&tier| tier != rolled)
        .find(|&tier| !is_empty(tier))
        .ok_or(NoCardsAvailable)
}
