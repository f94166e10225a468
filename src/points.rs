//! Spendable points and their elapsed-interval regeneration.

use serde::{Deserialize, Serialize};

/// Spendable balance and the time regeneration was last applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAccount {
    pub points: u32,
    /// Milliseconds since the Unix epoch.
    pub last_regen_timestamp: i64,
}

impl PointsAccount {
    /// Create an account holding `points`, with regeneration starting at `now_ms`.
    pub fn new(points: u32, now_ms: i64) -> Self {
        Self {
            points,
            last_regen_timestamp: now_ms,
        }
    }

    /// Whether the balance covers `cost`.
    pub fn can_afford(&self, cost: u32) -> bool {
        self.points >= cost
    }

    /// Deduct `cost`. Callers check [`can_afford`](Self::can_afford) first.
    pub fn spend(&mut self, cost: u32) {
        self.points = self.points.saturating_sub(cost);
    }

    /// Grant `amount` points per whole `interval_ms` elapsed, up to `max`.
    ///
    /// Only consumed intervals move the timestamp forward, so a partial
    /// interval carries into the next call. Returns the points granted.
    pub fn regenerate(&mut self, now_ms: i64, interval_ms: i64, amount: u32, max: u32) -> u32 {
        if interval_ms <= 0 {
            return 0;
        }
        let elapsed = match now_ms.checked_sub(self.last_regen_timestamp) {
            Some(elapsed) if elapsed >= 0 => elapsed,
            _ => {
                tracing::warn!(
                    now_ms,
                    last = self.last_regen_timestamp,
                    "Regeneration timestamp is ahead of the clock or out of range; resetting"
                );
                self.last_regen_timestamp = now_ms;
                return 0;
            }
        };
        if self.points >= max {
            self.last_regen_timestamp = now_ms;
            return 0;
        }

        let intervals = elapsed / interval_ms;
        if intervals == 0 {
            return 0;
        }

        let earned = u64::try_from(intervals)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(amount));
        let headroom = u64::from(max - self.points);
        let granted = earned.min(headroom) as u32;

        self.points += granted;
        if self.points >= max {
            self.last_regen_timestamp = now_ms;
        } else {
            self.last_regen_timestamp += intervals * interval_ms;
        }
        granted
    }

    /// Milliseconds until the next interval completes, or `None` when capped.
    pub fn ms_until_next(&self, now_ms: i64, interval_ms: i64, max: u32) -> Option<i64> {
        if self.points >= max || interval_ms <= 0 {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.last_regen_timestamp).max(0);
        Some(interval_ms - elapsed % interval_ms)
    }
}
