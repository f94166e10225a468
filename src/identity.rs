//! Variant identity: the composite key that separates regular, full-art and
//! masterpiece renditions of the same catalog card.
//!
//! Keys encode as `"<kind>:<baseId>"`. Decoding splits on the first `:`, so a
//! base id may itself contain colons and the encoding stays reversible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VaultError};
use crate::ledger::CollectionLedger;

const SEPARATOR: char = ':';

/// Suffixes used by save files written before composite keys existed.
const LEGACY_FULL_ART_SUFFIX: &str = "_fullart";
const LEGACY_MASTERPIECE_SUFFIX: &str = "_masterpiece";

// ---------------------------------------------------------------------------
// VariantKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKind {
    Regular,
    FullArt,
    Masterpiece,
}

impl VariantKind {
    /// Prefix used for this kind in encoded keys.
    pub fn tag(&self) -> &'static str {
        match self {
            VariantKind::Regular => "regular",
            VariantKind::FullArt => "fullart",
            VariantKind::Masterpiece => "masterpiece",
        }
    }

    pub fn from_tag(tag: &str) -> Option<VariantKind> {
        match tag {
            "regular" => Some(VariantKind::Regular),
            "fullart" => Some(VariantKind::FullArt),
            "masterpiece" => Some(VariantKind::Masterpiece),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// VariantKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VariantKey {
    base_id: String,
    kind: VariantKind,
}

impl VariantKey {
    /// Build the key for one variant of a catalog card.
    pub fn encode(base_id: impl Into<String>, kind: VariantKind) -> Self {
        Self {
            base_id: base_id.into(),
            kind,
        }
    }

    pub fn regular(base_id: impl Into<String>) -> Self {
        Self::encode(base_id, VariantKind::Regular)
    }

    pub fn full_art(base_id: impl Into<String>) -> Self {
        Self::encode(base_id, VariantKind::FullArt)
    }

    pub fn masterpiece(base_id: impl Into<String>) -> Self {
        Self::encode(base_id, VariantKind::Masterpiece)
    }

    /// Split the key back into its base id and kind.
    pub fn decode(&self) -> (&str, VariantKind) {
        (&self.base_id, self.kind)
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    /// Parse an encoded `"<kind>:<baseId>"` string.
    pub fn parse(encoded: &str) -> Result<Self> {
        let (tag, base) = encoded
            .split_once(SEPARATOR)
            .ok_or_else(|| VaultError::InvalidVariantKey(encoded.to_string()))?;
        let kind = VariantKind::from_tag(tag)
            .ok_or_else(|| VaultError::InvalidVariantKey(encoded.to_string()))?;
        Ok(Self::encode(base, kind))
    }

    /// Interpret a key from a save file that predates composite keys.
    ///
    /// Suffixed keys (`id_fullart`, `id_masterpiece`) carry their kind. Bare
    /// keys fall back to the record's own flags, if the caller has them.
    pub fn from_legacy(key: &str, is_full_art: Option<bool>, is_masterpiece: Option<bool>) -> Self {
        if let Some(base) = key.strip_suffix(LEGACY_FULL_ART_SUFFIX) {
            return Self::full_art(base);
        }
        if let Some(base) = key.strip_suffix(LEGACY_MASTERPIECE_SUFFIX) {
            return Self::masterpiece(base);
        }
        match (is_full_art, is_masterpiece) {
            (_, Some(true)) => Self::masterpiece(key),
            (Some(true), _) => Self::full_art(key),
            _ => Self::regular(key),
        }
    }

    /// Kind implied by a legacy key's suffix, if any.
    pub fn legacy_suffix_kind(key: &str) -> Option<VariantKind> {
        if key.ends_with(LEGACY_FULL_ART_SUFFIX) {
            Some(VariantKind::FullArt)
        } else if key.ends_with(LEGACY_MASTERPIECE_SUFFIX) {
            Some(VariantKind::Masterpiece)
        } else {
            None
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.tag(), SEPARATOR, self.base_id)
    }
}

impl FromStr for VariantKey {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<VariantKey> for String {
    fn from(key: VariantKey) -> String {
        key.to_string()
    }
}

impl TryFrom<String> for VariantKey {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// Whether the ledger already holds at least one copy of this variant.
pub fn is_owned(ledger: &CollectionLedger, set_code: &str, key: &VariantKey) -> bool {
    ledger.get(set_code, key).is_some()
}
