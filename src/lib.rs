//! Booster pack opening simulator.
//!
//! Draws booster packs from per-set card pools, records every pulled variant
//! in a persistent collection ledger, spends and regenerates points, and
//! keeps a short history of recently opened sets for a three-slot selector.
//!
//! # Quick start
//!
//! ```no_run
//! use booster_vault::{CollectionService, SetCatalog};
//! use booster_vault::catalog::load_catalog_file;
//!
//! let mut service = CollectionService::builder().build().unwrap();
//!
//! let raw = load_catalog_file("catalogs/sv1.json").unwrap();
//! let catalog = SetCatalog::from_raw("sv1", raw);
//!
//! let outcome = service.open_pack("sv1", &catalog).unwrap();
//! if let Some(pack) = outcome.pack() {
//!     println!("{} cards, {} new", pack.len(), pack.new_count());
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_service;
pub mod booster;
pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod ledger;
pub mod migrate;
pub mod models;
pub mod points;
pub mod state;
pub mod store;

#[cfg(feature = "async")]
pub use async_service::AsyncCollectionService;
pub use catalog::SetCatalog;
pub use config::PackConfig;
pub use error::{Result, VaultError};
pub use history::{DisplaySlots, RecencyHistory};
pub use identity::{VariantKey, VariantKind};
pub use ledger::CollectionLedger;
pub use models::{PackOutcome, PackResult};
pub use state::CollectionState;
pub use store::SaveStore;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use booster::PackComposer;
use migrate::{MigrationContext, SchemaMigrator};
use points::PointsAccount;

/// Source of the current time in milliseconds since the Unix epoch.
pub type Clock = Box<dyn Fn() -> i64 + Send>;

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// CollectionServiceBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CollectionService`].
///
/// Use [`CollectionService::builder()`] to obtain a builder, chain
/// configuration methods, and call [`build()`](CollectionServiceBuilder::build).
#[derive(Default)]
pub struct CollectionServiceBuilder {
    save_path: Option<PathBuf>,
    ephemeral: bool,
    config: PackConfig,
    rng: Option<Box<dyn RngCore + Send>>,
    clock: Option<Clock>,
}

impl CollectionServiceBuilder {
    /// Set a custom save file location.
    ///
    /// If not set, `collection.json` under the platform data directory is
    /// used (e.g. `~/.local/share/booster-vault` on Linux).
    pub fn save_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.save_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep all state in memory and never touch the filesystem.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Set the pack and points tunables. Validated by `build()`.
    pub fn config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the entropy-seeded generator, e.g. with a seeded `StdRng`.
    pub fn rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Replace the wall clock used for point regeneration.
    pub fn clock<F: Fn() -> i64 + Send + 'static>(mut self, clock: F) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validate the configuration, then load and migrate the save document.
    ///
    /// A missing save file starts a fresh collection with the configured
    /// starting points. The migrated document is written back only when
    /// migration changed something.
    pub fn build(self) -> Result<CollectionService> {
        self.config.validate()?;

        let clock: Clock = match self.clock {
            Some(clock) => clock,
            None => Box::new(now_millis),
        };
        let rng: Box<dyn RngCore + Send> = match self.rng {
            Some(rng) => rng,
            None => Box::new(StdRng::from_entropy()),
        };
        let now = clock();

        let store = if self.ephemeral {
            None
        } else {
            Some(SaveStore::new(
                self.save_path.unwrap_or_else(config::default_save_path),
            ))
        };

        let loaded = match &store {
            Some(store) => store.load()?,
            None => None,
        };

        let mut needs_write = false;
        let state = match loaded {
            Some(mut doc) => {
                let migrator = SchemaMigrator::new(MigrationContext {
                    starting_points: self.config.starting_points,
                    now_ms: now,
                });
                let report = migrator.migrate(&mut doc);
                needs_write = report.changed();
                let (mut state, mut dropped) =
                    CollectionState::from_document(&doc, self.config.starting_points, now);

                // Records in a document already stamped current may still lack
                // fields; backfill them and decode again.
                if dropped > 0 && report.from_version <= migrate::CURRENT_SCHEMA_VERSION {
                    let repaired = migrator.repair(&mut doc);
                    if repaired.changed() {
                        needs_write = true;
                        (state, dropped) =
                            CollectionState::from_document(&doc, self.config.starting_points, now);
                    }
                }
                if dropped > 0 {
                    tracing::warn!(dropped, "Dropped unreadable records while loading collection");
                }
                tracing::info!(
                    sets = state.ledger.set_codes().count(),
                    points = state.points.points,
                    "Loaded collection"
                );
                state
            }
            None => CollectionState::new(self.config.starting_points, now),
        };

        let active = state.history.most_recent().map(|s| s.to_string());
        let mut service = CollectionService {
            config: self.config,
            state,
            active,
            store,
            rng,
            clock,
            dirty: false,
        };
        if needs_write {
            service.persist();
        }
        Ok(service)
    }
}

// ---------------------------------------------------------------------------
// CollectionService
// ---------------------------------------------------------------------------

/// Owns the collection state and is the only way to mutate it.
///
/// Every mutating method writes the whole document back best-effort: a failed
/// write is logged, the in-memory state stays authoritative, and the next
/// successful write catches the file up.
pub struct CollectionService {
    config: PackConfig,
    state: CollectionState,
    active: Option<String>,
    store: Option<SaveStore>,
    rng: Box<dyn RngCore + Send>,
    clock: Clock,
    dirty: bool,
}

impl CollectionService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> CollectionServiceBuilder {
        CollectionServiceBuilder::default()
    }

    // -- Pack opening ------------------------------------------------------

    /// Open one pack of `set_code` from `catalog`.
    ///
    /// Returns [`PackOutcome::InsufficientFunds`] without changing anything
    /// when the balance is too low. Fails only if `catalog` belongs to a
    /// different set.
    pub fn open_pack(&mut self, set_code: &str, catalog: &SetCatalog) -> Result<PackOutcome> {
        if catalog.set_code() != set_code {
            return Err(VaultError::InvalidArgument(format!(
                "Catalog for set '{}' cannot open packs of '{}'",
                catalog.set_code(),
                set_code
            )));
        }

        let composer = PackComposer::new(&self.config);
        let outcome = composer.open(catalog, &mut self.state, &mut self.rng);

        if let PackOutcome::Opened(pack) = &outcome {
            tracing::info!(
                set = set_code,
                cards = pack.len(),
                new = pack.new_count(),
                god_pack = pack.is_god_pack,
                points = self.state.points.points,
                "Opened pack"
            );
            if self.active.is_none() {
                self.active = Some(set_code.to_string());
            }
            self.persist();
        }
        Ok(outcome)
    }

    // -- Selection ---------------------------------------------------------

    /// Make `set_code` the active set. History is left untouched.
    pub fn select_set(&mut self, set_code: &str) {
        self.active = Some(set_code.to_string());
    }

    /// The currently selected set, if any. Not persisted.
    pub fn active_set(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Left/center/right selector slots for the active set, if one is chosen.
    pub fn display_slots(&self) -> Option<DisplaySlots> {
        self.active
            .as_deref()
            .map(|active| history::project_display(active, &self.state.history))
    }

    // -- Points ------------------------------------------------------------

    /// Apply elapsed-interval regeneration as of the service clock.
    pub fn regenerate(&mut self) -> u32 {
        let now = (self.clock)();
        self.regenerate_at(now)
    }

    /// Apply regeneration as of `now_ms`. Returns the points granted.
    pub fn regenerate_at(&mut self, now_ms: i64) -> u32 {
        let granted = self.state.points.regenerate(
            now_ms,
            self.config.regen_interval_ms(),
            self.config.regen_amount,
            self.config.max_points,
        );
        if granted > 0 {
            tracing::debug!(granted, points = self.state.points.points, "Regenerated points");
            self.persist();
        }
        granted
    }

    /// Current spendable balance.
    pub fn points(&self) -> u32 {
        self.state.points.points
    }

    pub fn points_account(&self) -> &PointsAccount {
        &self.state.points
    }

    /// Milliseconds until the next point arrives, or `None` at the cap.
    pub fn ms_until_next_point(&self) -> Option<i64> {
        self.state.points.ms_until_next(
            (self.clock)(),
            self.config.regen_interval_ms(),
            self.config.max_points,
        )
    }

    /// Toggle free mode, in which packs cost nothing.
    pub fn set_free_mode(&mut self, free: bool) {
        self.config.free_mode = free;
    }

    // -- Collection --------------------------------------------------------

    /// Owned records for every set.
    pub fn ledger(&self) -> &CollectionLedger {
        &self.state.ledger
    }

    /// Sets opened most recently, newest first.
    pub fn history(&self) -> &RecencyHistory {
        &self.state.history
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Destroy every record of one set. Returns whether the set had any.
    pub fn clear_set(&mut self, set_code: &str) -> bool {
        let removed = self.state.ledger.clear_set(set_code);
        if removed {
            tracing::info!(set = set_code, "Cleared set from collection");
            self.persist();
        }
        removed
    }

    /// Destroy every record of every set.
    pub fn clear_all(&mut self) {
        self.state.ledger.clear_all();
        tracing::info!("Cleared entire collection");
        self.persist();
    }

    // -- Persistence -------------------------------------------------------

    /// Write the current state, surfacing any error.
    pub fn save(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&self.state.to_document())?;
        }
        self.dirty = false;
        Ok(())
    }

    /// Whether the last write attempt failed and the file is behind memory.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Location of the save file, or `None` for an ephemeral service.
    pub fn save_path(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.path.as_path())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            self.dirty = true;
            tracing::warn!(error = %e, "Failed to write collection; keeping in-memory state");
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CollectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .save_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        write!(
            f,
            "CollectionService(save_path={}, points={}, sets=[{}], recent=[{}])",
            path,
            self.state.points.points,
            self.state.ledger.set_codes().collect::<Vec<_>>().join(", "),
            self.state.history.entries().join(", ")
        )
    }
}
