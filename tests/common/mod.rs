//! Shared test fixtures for the booster-vault integration tests.
//!
//! Provides a small sample catalog, seeded RNGs, and helpers for building
//! services that are either purely in-memory or backed by a temp directory.

#![allow(dead_code)]

use booster_vault::models::{CardCatalogEntry, ImagePair, Rarity};
use booster_vault::{CollectionService, PackConfig, SetCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

pub const SET: &str = "sv1";

pub fn card(id: &str, name: &str, rarity: Rarity, number: &str) -> CardCatalogEntry {
    CardCatalogEntry::new(id, name, rarity, number).with_images(ImagePair::new(
        format!("img/{}.png", id),
        "img/back.png",
    ))
}

/// Two cards per tier in the main pool, two full-art cards, one masterpiece,
/// and one main-pool card in the spotlight pool.
pub fn sample_catalog() -> SetCatalog {
    let main = vec![
        card("c1", "Bulbasaur", Rarity::Common, "1"),
        card("c2", "Charmander", Rarity::Common, "4"),
        card("u1", "Ivysaur", Rarity::Uncommon, "2"),
        card("u2", "Charmeleon", Rarity::Uncommon, "5"),
        card("r1", "Venusaur", Rarity::Rare, "3"),
        card("r2", "Charizard", Rarity::Rare, "6"),
        card("m1", "Mew", Rarity::Mythic, "151"),
        card("m2", "Mewtwo", Rarity::Mythic, "150"),
    ];
    let full_art = vec![
        card("fa1", "Venusaur", Rarity::Rare, "201"),
        card("fa2", "Charizard", Rarity::Rare, "202"),
    ];
    let masterpiece = vec![card("mp1", "Mew", Rarity::Mythic, "301")];
    let spotlight = vec![card("c1", "Bulbasaur", Rarity::Common, "1")];
    SetCatalog::new(SET, main, full_art, masterpiece, spotlight)
}

/// A catalog with a single common card and nothing else.
pub fn single_card_catalog() -> SetCatalog {
    SetCatalog::new(
        SET,
        vec![card("c1", "Bulbasaur", Rarity::Common, "1")],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    )
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Default config with every special gate switched off.
pub fn plain_config() -> PackConfig {
    PackConfig {
        god_pack_chance: 0.0,
        bonus_chance: 0.0,
        secret_chance: 0.0,
        ..PackConfig::default()
    }
}

pub fn config_with_points(points: u32) -> PackConfig {
    PackConfig {
        starting_points: points,
        ..plain_config()
    }
}

/// In-memory service with a seeded RNG and a fixed clock.
pub fn memory_service(config: PackConfig) -> CollectionService {
    CollectionService::builder()
        .ephemeral(true)
        .config(config)
        .rng(seeded(7))
        .clock(|| 1_000_000)
        .build()
        .unwrap()
}

/// Save path inside a fresh temp directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn temp_save_path() -> (PathBuf, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("collection.json");
    (path, tmp_dir)
}

pub fn disk_service(path: &std::path::Path, config: PackConfig) -> CollectionService {
    CollectionService::builder()
        .save_path(path)
        .config(config)
        .rng(seeded(11))
        .clock(|| 1_000_000)
        .build()
        .unwrap()
}
