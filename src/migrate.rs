//! Save document migration.
//!
//! Documents carry a `schemaVersion` (absent means 0). On load every step
//! newer than the document's version runs in order; each step only fills in
//! what is missing, so running one twice changes nothing. A record that is
//! not an object is skipped and reported, and the rest of the document still
//! migrates.

use serde_json::{Map, Value};

use crate::config;
use crate::identity::{VariantKey, VariantKind};

pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Defaults that depend on the running configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationContext {
    pub starting_points: u32,
    pub now_ms: i64,
}

/// What a migration pass did to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Number of fields added, coerced or rewritten.
    pub changes: usize,
    /// JSON paths of entries left untouched because of their shape.
    pub skipped: Vec<String>,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.changes > 0
    }
}

type StepFn = fn(&mut Map<String, Value>, &MigrationContext, &mut MigrationReport);

struct MigrationStep {
    version: u32,
    name: &'static str,
    apply: StepFn,
}

const STEPS: &[MigrationStep] = &[
    MigrationStep {
        version: 1,
        name: "containers",
        apply: ensure_containers,
    },
    MigrationStep {
        version: 2,
        name: "record fields",
        apply: backfill_records,
    },
    MigrationStep {
        version: 3,
        name: "composite keys",
        apply: rewrite_legacy_keys,
    },
];

/// Applies the ordered migration steps to a raw save document.
pub struct SchemaMigrator {
    ctx: MigrationContext,
}

impl SchemaMigrator {
    /// Create a migrator that fills defaults from `ctx`.
    pub fn new(ctx: MigrationContext) -> Self {
        Self { ctx }
    }

    /// Bring `doc` up to [`CURRENT_SCHEMA_VERSION`].
    pub fn migrate(&self, doc: &mut Value) -> MigrationReport {
        let mut report = MigrationReport::default();
        ensure_object_root(doc, &mut report);
        let Value::Object(root) = doc else {
            return report;
        };

        let from = root
            .get("schemaVersion")
            .and_then(|v| v.as_u64())
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0);
        report.from_version = from;
        report.to_version = from;

        if from > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                version = from,
                supported = CURRENT_SCHEMA_VERSION,
                "Save document is newer than this build; leaving it unmigrated"
            );
            return report;
        }

        for step in STEPS.iter().filter(|s| s.version > from) {
            let before = report.changes;
            (step.apply)(root, &self.ctx, &mut report);
            tracing::debug!(
                step = step.name,
                version = step.version,
                changes = report.changes - before,
                "Applied migration step"
            );
        }

        if from < CURRENT_SCHEMA_VERSION {
            root.insert("schemaVersion".into(), Value::from(CURRENT_SCHEMA_VERSION));
            report.changes += 1;
            report.to_version = CURRENT_SCHEMA_VERSION;
        }

        if report.changed() {
            tracing::info!(
                from = report.from_version,
                to = report.to_version,
                changes = report.changes,
                skipped = report.skipped.len(),
                "Migrated save document"
            );
        }
        report
    }

    /// Run every step regardless of the recorded version.
    ///
    /// Repairs hand-edited documents that claim to be current but are missing
    /// fields.
    pub fn repair(&self, doc: &mut Value) -> MigrationReport {
        let mut report = MigrationReport::default();
        ensure_object_root(doc, &mut report);
        let Value::Object(root) = doc else {
            return report;
        };
        for step in STEPS {
            (step.apply)(root, &self.ctx, &mut report);
        }
        if root.get("schemaVersion").and_then(|v| v.as_u64()) != Some(u64::from(CURRENT_SCHEMA_VERSION)) {
            root.insert("schemaVersion".into(), Value::from(CURRENT_SCHEMA_VERSION));
            report.changes += 1;
        }
        report.to_version = CURRENT_SCHEMA_VERSION;
        report
    }
}

fn ensure_object_root(doc: &mut Value, report: &mut MigrationReport) {
    if !doc.is_object() {
        report.skipped.push("$".into());
        *doc = Value::Object(Map::new());
        report.changes += 1;
    }
}

// ---------------------------------------------------------------------------
// v1: top-level containers and the points account
// ---------------------------------------------------------------------------

fn ensure_containers(root: &mut Map<String, Value>, ctx: &MigrationContext, report: &mut MigrationReport) {
    if !root.get("cards").is_some_and(Value::is_object) {
        if root.contains_key("cards") {
            report.skipped.push("cards".into());
        }
        root.insert("cards".into(), Value::Object(Map::new()));
        report.changes += 1;
    }

    if !root.get("recentPacks").is_some_and(Value::is_array) {
        let seeded = match root.get("lastPack") {
            Some(Value::String(code)) if !code.is_empty() => vec![Value::String(code.clone())],
            _ => Vec::new(),
        };
        root.insert("recentPacks".into(), Value::Array(seeded));
        report.changes += 1;
    }

    if !root.contains_key("lastPack") {
        let front = root
            .get("recentPacks")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .filter(|v| v.is_string())
            .cloned()
            .unwrap_or(Value::Null);
        root.insert("lastPack".into(), front);
        report.changes += 1;
    }

    let points_ok = root.get("points").and_then(|v| v.as_u64()).is_some_and(|p| p <= u64::from(u32::MAX));
    if !points_ok {
        let points = match root.get("points").and_then(|v| v.as_f64()) {
            Some(p) if p.is_finite() && p >= 0.0 => p.floor().min(f64::from(u32::MAX)) as u32,
            _ => ctx.starting_points,
        };
        root.insert("points".into(), Value::from(points));
        report.changes += 1;
    }

    if root.get("lastRegenTimestamp").and_then(|v| v.as_i64()).is_none() {
        let ts = match root.get("lastRegenTimestamp").and_then(|v| v.as_f64()) {
            Some(t) if t.is_finite() && t >= 0.0 => t as i64,
            _ => ctx.now_ms,
        };
        root.insert("lastRegenTimestamp".into(), Value::from(ts));
        report.changes += 1;
    }
}

// ---------------------------------------------------------------------------
// v2: record field backfill
// ---------------------------------------------------------------------------

fn backfill_records(root: &mut Map<String, Value>, _ctx: &MigrationContext, report: &mut MigrationReport) {
    let Some(Value::Object(sets)) = root.get_mut("cards") else {
        return;
    };
    for (set_code, records) in sets.iter_mut() {
        let Value::Object(records) = records else {
            report.skipped.push(format!("cards.{}", set_code));
            continue;
        };
        for (key, record) in records.iter_mut() {
            let Value::Object(record) = record else {
                report.skipped.push(format!("cards.{}.{}", set_code, key));
                continue;
            };
            report.changes += backfill_record(key, record);
        }
    }
}

/// Kind implied by a record's key, in either encoding.
fn key_kind(key: &str) -> Option<VariantKind> {
    match VariantKey::parse(key) {
        Ok(parsed) => Some(parsed.kind()),
        Err(_) => VariantKey::legacy_suffix_kind(key),
    }
}

fn backfill_record(key: &str, record: &mut Map<String, Value>) -> usize {
    let mut changes = 0;
    let kind = key_kind(key);

    let mut set_default = |record: &mut Map<String, Value>, field: &str, value: Value| {
        record.insert(field.to_string(), value);
        changes += 1;
    };

    if !record.get("isFullArt").is_some_and(Value::is_boolean) {
        set_default(record, "isFullArt", Value::Bool(kind == Some(VariantKind::FullArt)));
    }
    if !record.get("isMasterpiece").is_some_and(Value::is_boolean) {
        set_default(record, "isMasterpiece", Value::Bool(kind == Some(VariantKind::Masterpiece)));
    }
    if !record.get("isSpotlight").is_some_and(Value::is_boolean) {
        set_default(record, "isSpotlight", Value::Bool(false));
    }

    if !has_text(record, "name") {
        set_default(record, "name", Value::from(config::UNKNOWN_CARD_NAME));
    }
    if !has_text(record, "rarity") {
        set_default(record, "rarity", Value::from("common"));
    }
    if !has_text(record, "frontImage") {
        let front = ["image", "imageUrl"]
            .iter()
            .find_map(|legacy| record.get(*legacy).and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or(config::MISSING_IMAGE)
            .to_string();
        set_default(record, "frontImage", Value::from(front));
    }
    if !has_text(record, "backImage") {
        set_default(record, "backImage", Value::from(config::CARD_BACK_PLACEHOLDER));
    }

    if !record.get("collectorNumber").is_some_and(Value::is_string) {
        let number = match record.get("collectorNumber").or_else(|| record.get("number")) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        set_default(record, "collectorNumber", Value::from(number));
    }

    let count_ok = record
        .get("count")
        .and_then(|v| v.as_u64())
        .is_some_and(|c| c >= 1 && c <= u64::from(u32::MAX));
    if !count_ok {
        let count = match record.get("count").and_then(|v| v.as_f64()) {
            Some(c) if c.is_finite() && c >= 1.0 => c.floor().min(f64::from(u32::MAX)) as u32,
            _ => 1,
        };
        set_default(record, "count", Value::from(count));
    }

    changes
}

fn has_text(record: &Map<String, Value>, field: &str) -> bool {
    record
        .get(field)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// v3: suffix-encoded keys to composite keys
// ---------------------------------------------------------------------------

fn rewrite_legacy_keys(root: &mut Map<String, Value>, _ctx: &MigrationContext, report: &mut MigrationReport) {
    let Some(Value::Object(sets)) = root.get_mut("cards") else {
        return;
    };
    for records in sets.values_mut() {
        let Value::Object(records) = records else {
            continue;
        };
        if records.keys().all(|k| VariantKey::parse(k).is_ok()) {
            continue;
        }

        let old = std::mem::take(records);
        for (key, record) in old {
            if VariantKey::parse(&key).is_ok() {
                merge_record(records, key, record);
                continue;
            }
            let flag = |name: &str| record.get(name).and_then(|v| v.as_bool());
            let new_key = VariantKey::from_legacy(&key, flag("isFullArt"), flag("isMasterpiece")).to_string();
            merge_record(records, new_key, record);
            report.changes += 1;
        }
    }
}

/// Insert `record` under `key`, summing counts if two legacy keys collide.
fn merge_record(records: &mut Map<String, Value>, key: String, record: Value) {
    match records.get_mut(&key) {
        Some(Value::Object(existing)) => {
            let add = record.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
            let current = existing.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
            let total = current.saturating_add(add).min(u64::from(u32::MAX));
            existing.insert("count".into(), Value::from(total));
        }
        _ => {
            records.insert(key, record);
        }
    }
}
