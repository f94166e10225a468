//! Booster pack composer.
//!
//! Draws the slots of one pack from a [`SetCatalog`] and commits them to the
//! collection state. Gates are evaluated in a fixed order: god pack, the base
//! tier rolls, bonus, then secret. The secret gate is only reached when the
//! bonus gate fired.

use rand::seq::SliceRandom;
use rand::Rng;

use super::rarity::{NoCardsAvailable, RarityResolver};
use crate::catalog::SetCatalog;
use crate::config::PackConfig;
use crate::identity::{self, VariantKey, VariantKind};
use crate::models::{CardCatalogEntry, CollectionRecord, PackCard, PackOutcome, PackResult};
use crate::state::CollectionState;

// ---------------------------------------------------------------------------
// Draw output
// ---------------------------------------------------------------------------

/// One drawn slot before it touches the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnSlot<'c> {
    pub entry: &'c CardCatalogEntry,
    pub kind: VariantKind,
    pub is_spotlight: bool,
    pub is_bonus: bool,
    pub is_secret: bool,
    pub is_god_pack: bool,
}

impl<'c> DrawnSlot<'c> {
    fn regular(entry: &'c CardCatalogEntry, is_spotlight: bool) -> Self {
        Self {
            entry,
            kind: VariantKind::Regular,
            is_spotlight,
            is_bonus: false,
            is_secret: false,
            is_god_pack: false,
        }
    }

    fn full_art(entry: &'c CardCatalogEntry) -> Self {
        Self {
            entry,
            kind: VariantKind::FullArt,
            is_spotlight: false,
            is_bonus: false,
            is_secret: false,
            is_god_pack: false,
        }
    }

    /// Ledger key for this slot's variant.
    pub fn key(&self) -> VariantKey {
        VariantKey::encode(self.entry.id.clone(), self.kind)
    }
}

/// The slots of one pack in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackDraw<'c> {
    pub slots: Vec<DrawnSlot<'c>>,
    pub is_god_pack: bool,
    pub got_bonus: bool,
    /// Base slots dropped because every tier pool was empty.
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// PackComposer
// ---------------------------------------------------------------------------

/// Builds packs from a [`SetCatalog`] according to a [`PackConfig`].
///
/// Borrows the config for the duration of one or more opens.
pub struct PackComposer<'a> {
    config: &'a PackConfig,
    resolver: RarityResolver,
}

impl<'a> PackComposer<'a> {
    /// Create a new composer bound to `config`.
    pub fn new(config: &'a PackConfig) -> Self {
        Self {
            config,
            resolver: RarityResolver::new(config.thresholds),
        }
    }

    /// Draw the slots of one pack without touching any state.
    pub fn draw<'c, R: Rng + ?Sized>(&self, catalog: &'c SetCatalog, rng: &mut R) -> PackDraw<'c> {
        let mut draw = PackDraw::default();
        let full_art = catalog.full_art();

        // God pack: every slot is a full-art pick, with replacement.
        if !full_art.is_empty() && rng.gen_bool(self.config.god_pack_chance) {
            draw.is_god_pack = true;
            for _ in 0..self.config.pack_size {
                if let Some(entry) = full_art.choose(rng) {
                    draw.slots.push(DrawnSlot {
                        is_god_pack: true,
                        ..DrawnSlot::full_art(entry)
                    });
                }
            }
            tracing::debug!(set = catalog.set_code(), "God pack drawn");
            return draw;
        }

        for slot in 0..self.config.pack_size {
            let roll: f64 = rng.gen_range(0.0..100.0);
            match self.pick_regular(catalog, roll, rng) {
                Ok(entry) => draw
                    .slots
                    .push(DrawnSlot::regular(entry, catalog.is_spotlight(entry))),
                Err(NoCardsAvailable) => {
                    draw.dropped += 1;
                    tracing::warn!(
                        set = catalog.set_code(),
                        slot,
                        roll,
                        "No cards available in any tier; dropping slot"
                    );
                }
            }
        }

        if !full_art.is_empty() && rng.gen_bool(self.config.bonus_chance) {
            if let Some(entry) = full_art.choose(rng) {
                draw.got_bonus = true;
                draw.slots.push(DrawnSlot {
                    is_bonus: true,
                    ..DrawnSlot::full_art(entry)
                });
            }
        }

        let masterpieces = catalog.masterpiece();
        if draw.got_bonus
            && !masterpieces.is_empty()
            && rng.gen_bool(self.config.secret_chance)
        {
            if let Some(entry) = masterpieces.choose(rng) {
                draw.slots.push(DrawnSlot {
                    entry,
                    kind: VariantKind::Masterpiece,
                    is_spotlight: false,
                    is_bonus: false,
                    is_secret: true,
                    is_god_pack: false,
                });
            }
        }

        tracing::debug!(
            set = catalog.set_code(),
            slots = draw.slots.len(),
            bonus = draw.got_bonus,
            dropped = draw.dropped,
            "Pack drawn"
        );
        draw
    }

    fn pick_regular<'c, R: Rng + ?Sized>(
        &self,
        catalog: &'c SetCatalog,
        roll: f64,
        rng: &mut R,
    ) -> Result<&'c CardCatalogEntry, NoCardsAvailable> {
        let tier = self.resolver.resolve_in(roll, catalog)?;
        let position = rng.gen_range(0..catalog.tier_len(tier));
        catalog.tier_entry(tier, position).ok_or(NoCardsAvailable)
    }

    /// Run one complete open-pack transaction against `state`.
    ///
    /// Refuses without mutating anything when the balance is short. Otherwise
    /// commits every slot in draw order, touches the recency history and
    /// charges the cost (unless in free mode).
    pub fn open<R: Rng + ?Sized>(
        &self,
        catalog: &SetCatalog,
        state: &mut CollectionState,
        rng: &mut R,
    ) -> PackOutcome {
        let cost = self.config.cost;
        let free = self.config.free_mode;
        if !free && !state.points.can_afford(cost) {
            tracing::debug!(points = state.points.points, cost, "Pack refused: insufficient points");
            return PackOutcome::InsufficientFunds {
                points: state.points.points,
                cost,
            };
        }

        let draw = self.draw(catalog, rng);
        let set_code = catalog.set_code();

        let mut cards = Vec::with_capacity(draw.slots.len());
        for slot in &draw.slots {
            let key = slot.key();
            let is_new = !identity::is_owned(&state.ledger, set_code, &key);
            let seed = CollectionRecord::seed(slot.entry, slot.kind, slot.is_spotlight);
            let record = state.ledger.increment(set_code, key.clone(), seed).clone();
            cards.push(PackCard {
                key,
                record,
                is_new,
                is_bonus: slot.is_bonus,
                is_secret: slot.is_secret,
                is_god_pack: slot.is_god_pack,
            });
        }

        state.history.touch(set_code);

        let points_spent = if free { 0 } else { cost };
        state.points.spend(points_spent);

        PackOutcome::Opened(PackResult {
            set_code: set_code.to_string(),
            cards,
            is_god_pack: draw.is_god_pack,
            got_bonus: draw.got_bonus,
            points_spent,
        })
    }
}
