//! Async wrapper around [`CollectionService`] for use in Tokio runtimes.
//!
//! Runs service operations on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping file writes off the event loop,
//! and drives point regeneration from a periodic timer task.
//!
//! # Example
//!
//! ```no_run
//! use booster_vault::{AsyncCollectionService, CollectionService};
//! use std::time::Duration;
//!
//! # async fn example() -> booster_vault::Result<()> {
//! let service = CollectionService::builder().build()?;
//! let service = AsyncCollectionService::new(service);
//!
//! let _ticker = service.spawn_regen_ticker(Duration::from_secs(30))?;
//! let points = service.run(|s| Ok(s.points())).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::catalog::SetCatalog;
use crate::error::{Result, VaultError};
use crate::models::PackOutcome;
use crate::CollectionService;

/// Shared, lock-guarded [`CollectionService`].
///
/// The mutex serializes every operation, so a regeneration tick can never
/// interleave with a pack being opened.
#[derive(Clone)]
pub struct AsyncCollectionService {
    inner: Arc<Mutex<CollectionService>>,
}

impl AsyncCollectionService {
    pub fn new(service: CollectionService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Run a sync service operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CollectionService) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = service
                .lock()
                .map_err(|_| VaultError::InvalidArgument("Service lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| VaultError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Open a pack asynchronously.
    pub async fn open_pack(&self, set_code: &str, catalog: Arc<SetCatalog>) -> Result<PackOutcome> {
        let set_code = set_code.to_string();
        self.run(move |s| s.open_pack(&set_code, &catalog)).await
    }

    pub async fn regenerate(&self) -> Result<u32> {
        self.run(|s| Ok(s.regenerate())).await
    }

    /// Start a task that applies regeneration every `period`.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down. A zero `period` is rejected.
    pub fn spawn_regen_ticker(&self, period: Duration) -> Result<JoinHandle<()>> {
        if period.is_zero() {
            return Err(VaultError::InvalidArgument(
                "Regeneration tick period must be non-zero".into(),
            ));
        }
        let service = self.clone();
        Ok(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = service.regenerate().await {
                    tracing::warn!(error = %e, "Regeneration tick failed");
                }
            }
        }))
    }

    /// Return the inner service if this is the last handle.
    pub fn into_inner(self) -> Option<CollectionService> {
        Arc::try_unwrap(self.inner)
            .ok()
            .and_then(|m| m.into_inner().ok())
    }
}
