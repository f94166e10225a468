use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config;

// ---------------------------------------------------------------------------
// Rarity — Draw tier of a catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }

    /// Parse a catalog rarity name, ignoring case.
    ///
    /// Returns `None` for names outside the four draw tiers.
    pub fn parse(name: &str) -> Option<Rarity> {
        match name.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "mythic" | "mythic rare" | "mythic_rare" => Some(Rarity::Mythic),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ImagePair — Front and back artwork, always present after ingestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePair {
    pub front: String,
    pub back: String,
}

impl ImagePair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CardCatalogEntry — Normalized, read-only catalog card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCatalogEntry {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub number: String,
    pub images: ImagePair,
    #[serde(default)]
    pub is_full_art_source: bool,
    #[serde(default)]
    pub is_spotlight: bool,
    #[serde(default)]
    pub is_masterpiece_source: bool,
}

impl CardCatalogEntry {
    /// Build a plain main-pool entry with placeholder artwork.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            number: number.into(),
            images: ImagePair::new(config::MISSING_IMAGE, config::CARD_BACK_PLACEHOLDER),
            is_full_art_source: false,
            is_spotlight: false,
            is_masterpiece_source: false,
        }
    }

    pub fn with_images(mut self, images: ImagePair) -> Self {
        self.images = images;
        self
    }
}

// ---------------------------------------------------------------------------
// RawCatalogEntry — Catalog payload as delivered, before normalization
// ---------------------------------------------------------------------------

/// Collector numbers arrive as either JSON strings or integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawImages {
    pub front: Option<String>,
    pub back: Option<String>,
    pub large: Option<String>,
    pub small: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogEntry {
    pub id: String,
    pub name: Option<String>,
    pub rarity: Option<String>,
    #[serde(alias = "collectorNumber")]
    pub number: Option<RawNumber>,
    pub images: Option<RawImages>,
    #[serde(alias = "imageUrl")]
    pub image: Option<String>,
    pub back_image: Option<String>,
    #[serde(default, alias = "fullArt")]
    pub is_full_art: bool,
    #[serde(default, alias = "spotlight")]
    pub is_spotlight: bool,
    #[serde(default, alias = "masterpiece")]
    pub is_masterpiece: bool,
}

impl RawCatalogEntry {
    /// Collapse the optional, differently-shaped fields into a fixed entry.
    pub fn normalize(self) -> CardCatalogEntry {
        let images = self.images.unwrap_or_default();
        let front = images
            .front
            .or(images.large)
            .or(images.small)
            .or(self.image)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| config::MISSING_IMAGE.to_string());
        let back = images
            .back
            .or(self.back_image)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| config::CARD_BACK_PLACEHOLDER.to_string());

        let rarity = match self.rarity.as_deref() {
            Some(name) => Rarity::parse(name).unwrap_or_else(|| {
                tracing::debug!(card = %self.id, rarity = name, "Unrecognized rarity, treating as common");
                Rarity::Common
            }),
            None => Rarity::Common,
        };

        let number = match self.number {
            Some(RawNumber::Text(s)) => s,
            Some(RawNumber::Int(n)) => n.to_string(),
            None => String::new(),
        };

        CardCatalogEntry {
            name: self.name.unwrap_or_else(|| config::UNKNOWN_CARD_NAME.to_string()),
            id: self.id,
            rarity,
            number,
            images: ImagePair { front, back },
            is_full_art_source: self.is_full_art,
            is_spotlight: self.is_spotlight,
            is_masterpiece_source: self.is_masterpiece,
        }
    }
}
