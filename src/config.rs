//! Constants and tunables for pack composition, points and persistence.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Number of regular slots in a pack (and of full-art slots in a god pack).
pub const PACK_SIZE: usize = 5;
/// Points charged per pack outside free mode.
pub const PACK_COST: u32 = 6;

pub const GOD_PACK_CHANCE: f64 = 0.005;
pub const BONUS_CHANCE: f64 = 0.10;
pub const SECRET_CHANCE: f64 = 0.10;

/// Rolls below this resolve to mythic.
pub const MYTHIC_THRESHOLD: f64 = 3.0;
/// Rolls below this (and at or above the mythic threshold) resolve to rare.
pub const RARE_THRESHOLD: f64 = 10.0;
/// Rolls below this (and at or above the rare threshold) resolve to uncommon.
pub const UNCOMMON_THRESHOLD: f64 = 30.0;

pub const STARTING_POINTS: u32 = 24;
pub const MAX_POINTS: u32 = 24;
pub const REGEN_AMOUNT: u32 = 1;
pub const REGEN_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Canonical card back used when a catalog entry or record has no back image.
pub const CARD_BACK_PLACEHOLDER: &str = "assets/card-back.png";
/// Front image sentinel for entries and records that lost their artwork.
pub const MISSING_IMAGE: &str = "assets/missing.png";
/// Name sentinel for records persisted without a name.
pub const UNKNOWN_CARD_NAME: &str = "Unknown Card";

pub const SAVE_FILE_NAME: &str = "collection.json";
pub const DATA_DIR_NAME: &str = "booster-vault";

/// Platform data directory for the save file.
pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join(DATA_DIR_NAME)
    } else {
        PathBuf::from(".booster-vault")
    }
}

pub fn default_save_path() -> PathBuf {
    default_data_dir().join(SAVE_FILE_NAME)
}

// ---------------------------------------------------------------------------
// TierThresholds
// ---------------------------------------------------------------------------

/// Cumulative, exclusive upper bounds on a `[0, 100)` roll for the rarer tiers.
///
/// Anything at or above `uncommon` is common.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub mythic: f64,
    pub rare: f64,
    pub uncommon: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            mythic: MYTHIC_THRESHOLD,
            rare: RARE_THRESHOLD,
            uncommon: UNCOMMON_THRESHOLD,
        }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<()> {
        let ordered = [self.mythic, self.rare, self.uncommon];
        if ordered.iter().any(|t| !t.is_finite() || *t <= 0.0 || *t > 100.0) {
            return Err(VaultError::InvalidArgument(format!(
                "Tier thresholds must lie in (0, 100]: {:?}",
                self
            )));
        }
        if !(self.mythic < self.rare && self.rare < self.uncommon) {
            return Err(VaultError::InvalidArgument(format!(
                "Tier thresholds must be strictly ascending: {:?}",
                self
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PackConfig
// ---------------------------------------------------------------------------

/// Tunables for pack composition and the points economy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackConfig {
    pub pack_size: usize,
    pub cost: u32,
    pub god_pack_chance: f64,
    pub bonus_chance: f64,
    pub secret_chance: f64,
    pub thresholds: TierThresholds,
    /// When set, packs are free and never touch the points balance.
    pub free_mode: bool,
    pub starting_points: u32,
    pub max_points: u32,
    pub regen_amount: u32,
    #[serde(with = "duration_ms")]
    pub regen_interval: Duration,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            pack_size: PACK_SIZE,
            cost: PACK_COST,
            god_pack_chance: GOD_PACK_CHANCE,
            bonus_chance: BONUS_CHANCE,
            secret_chance: SECRET_CHANCE,
            thresholds: TierThresholds::default(),
            free_mode: false,
            starting_points: STARTING_POINTS,
            max_points: MAX_POINTS,
            regen_amount: REGEN_AMOUNT,
            regen_interval: REGEN_INTERVAL,
        }
    }
}

impl PackConfig {
    /// Reject configurations the composer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pack_size == 0 {
            return Err(VaultError::InvalidArgument(
                "Pack size must be at least 1".into(),
            ));
        }
        for (label, p) in [
            ("god pack", self.god_pack_chance),
            ("bonus", self.bonus_chance),
            ("secret", self.secret_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(VaultError::InvalidArgument(format!(
                    "{} chance must be within [0, 1], got {}",
                    label, p
                )));
            }
        }
        if self.regen_interval.is_zero() {
            return Err(VaultError::InvalidArgument(
                "Regeneration interval must be non-zero".into(),
            ));
        }
        self.thresholds.validate()
    }

    pub(crate) fn regen_interval_ms(&self) -> i64 {
        i64::try_from(self.regen_interval.as_millis()).unwrap_or(i64::MAX)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
