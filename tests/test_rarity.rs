//! Rarity resolution and fallback chain tests.

mod common;

use booster_vault::booster::rarity::{fallback, NoCardsAvailable, RarityResolver};
use booster_vault::config::TierThresholds;
use booster_vault::models::Rarity;
use booster_vault::SetCatalog;

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_threshold_boundaries_fall_to_less_rare_tier() {
    let resolver = RarityResolver::default();

    assert_eq!(resolver.resolve(0.0), Rarity::Mythic);
    assert_eq!(resolver.resolve(2.999), Rarity::Mythic);
    assert_eq!(resolver.resolve(3.0), Rarity::Rare);
    assert_eq!(resolver.resolve(9.999), Rarity::Rare);
    assert_eq!(resolver.resolve(10.0), Rarity::Uncommon);
    assert_eq!(resolver.resolve(29.999), Rarity::Uncommon);
    assert_eq!(resolver.resolve(30.0), Rarity::Common);
    assert_eq!(resolver.resolve(99.999), Rarity::Common);
}

#[test]
fn resolve_uses_custom_thresholds() {
    let resolver = RarityResolver::new(TierThresholds {
        mythic: 1.0,
        rare: 50.0,
        uncommon: 60.0,
    });

    assert_eq!(resolver.resolve(0.5), Rarity::Mythic);
    assert_eq!(resolver.resolve(1.0), Rarity::Rare);
    assert_eq!(resolver.resolve(55.0), Rarity::Uncommon);
    assert_eq!(resolver.resolve(60.0), Rarity::Common);
}

#[test]
fn thresholds_must_ascend() {
    let bad = TierThresholds {
        mythic: 10.0,
        rare: 5.0,
        uncommon: 30.0,
    };
    assert!(bad.validate().is_err());

    let out_of_range = TierThresholds {
        mythic: 3.0,
        rare: 10.0,
        uncommon: 130.0,
    };
    assert!(out_of_range.validate().is_err());
    assert!(TierThresholds::default().validate().is_ok());
}

// ---------------------------------------------------------------------------
// fallback
// ---------------------------------------------------------------------------

#[test]
fn fallback_keeps_rolled_tier_when_available() {
    let result = fallback(Rarity::Rare, |_| false);
    assert_eq!(result, Ok(Rarity::Rare));
}

#[test]
fn fallback_uses_static_order_not_nearest_tier() {
    // Mythic and uncommon are empty; rare is "nearer" to mythic, but the
    // chain always starts from common.
    let empty = |r: Rarity| matches!(r, Rarity::Mythic | Rarity::Uncommon);
    assert_eq!(fallback(Rarity::Mythic, empty), Ok(Rarity::Common));
}

#[test]
fn fallback_skips_the_tier_already_tried() {
    let empty = |r: Rarity| r == Rarity::Common;
    assert_eq!(fallback(Rarity::Common, empty), Ok(Rarity::Uncommon));
}

#[test]
fn fallback_reaches_mythic_last() {
    let empty = |r: Rarity| r != Rarity::Mythic;
    assert_eq!(fallback(Rarity::Uncommon, empty), Ok(Rarity::Mythic));
}

#[test]
fn fallback_signals_when_every_pool_is_empty() {
    assert_eq!(fallback(Rarity::Rare, |_| true), Err(NoCardsAvailable));
}

#[test]
fn resolve_in_consults_catalog_pools() {
    let catalog = SetCatalog::new(
        common::SET,
        vec![
            common::card("r1", "Venusaur", Rarity::Rare, "3"),
            common::card("c1", "Bulbasaur", Rarity::Common, "1"),
        ],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    );
    let resolver = RarityResolver::default();

    // 1.0 rolls mythic, which is empty here.
    assert_eq!(resolver.resolve_in(1.0, &catalog), Ok(Rarity::Common));
    assert_eq!(resolver.resolve_in(5.0, &catalog), Ok(Rarity::Rare));
    // 20.0 rolls uncommon, also empty.
    assert_eq!(resolver.resolve_in(20.0, &catalog), Ok(Rarity::Common));
}

#[test]
fn resolve_in_empty_catalog_has_no_cards() {
    let catalog = SetCatalog::new(common::SET, Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let resolver = RarityResolver::default();
    assert_eq!(resolver.resolve_in(50.0, &catalog), Err(NoCardsAvailable));
}
