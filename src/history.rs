//! Recently opened sets and the three-slot selector built from them.

use serde::{Deserialize, Serialize};

/// Maximum number of set codes remembered.
pub const HISTORY_LIMIT: usize = 3;

// ---------------------------------------------------------------------------
// RecencyHistory
// ---------------------------------------------------------------------------

/// Most-recent-first list of at most [`HISTORY_LIMIT`] unique set codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyHistory {
    entries: Vec<String>,
}

impl RecencyHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping duplicates and overflow.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut history = Self::new();
        for code in entries {
            let code = code.into();
            if history.entries.len() == HISTORY_LIMIT {
                break;
            }
            if !history.entries.contains(&code) {
                history.entries.push(code);
            }
        }
        history
    }

    /// Move `set_code` to the front, inserting it if absent.
    pub fn touch(&mut self, set_code: &str) {
        self.entries.retain(|code| code != set_code);
        self.entries.insert(0, set_code.to_string());
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Set codes, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The last set a pack was opened from.
    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(|s| s.as_str())
    }

    pub fn contains(&self, set_code: &str) -> bool {
        self.entries.iter().any(|code| code == set_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shorthand for [`project_display`] with this history.
    pub fn project(&self, active: &str) -> DisplaySlots {
        project_display(active, self)
    }
}

// ---------------------------------------------------------------------------
// DisplaySlots
// ---------------------------------------------------------------------------

/// Set codes for the left, center and right selector positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySlots {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Project the active set and history into left/center/right slots.
///
/// The center is always `active`. Side slots show the other recent sets in
/// recency order, mirroring a single candidate on both sides and falling back
/// to `active` when there is nothing else to show.
pub fn project_display(active: &str, history: &RecencyHistory) -> DisplaySlots {
    let candidates: Vec<&str> = history
        .entries
        .iter()
        .map(|s| s.as_str())
        .filter(|code| *code != active)
        .collect();

    let (left, right) = match candidates.as_slice() {
        [] => (active, active),
        [only] => (*only, *only),
        [first, second, ..] => (*first, *second),
    };

    DisplaySlots {
        left: left.to_string(),
        center: active.to_string(),
        right: right.to_string(),
    }
}
