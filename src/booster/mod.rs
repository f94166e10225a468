//! Pack drawing: rarity resolution and pack composition.

pub mod composer;
pub mod rarity;

pub use composer::{DrawnSlot, PackComposer, PackDraw};
pub use rarity::{NoCardsAvailable, RarityResolver, FALLBACK_ORDER};
