//! Schema migration for the persisted `fitnessData` document.
//!
//! Version history:
//! - 0: unversioned documents. Entries may lack `waterIntake`, `exerciseLogs`,
//!   `exercisePerformance`, `meals`, macro fields or `updatedAt`, and the same
//!   date may appear more than once.
//! - 1: every entry has all fields and a populated `updatedAt`.

use serde_json::{json, Map, Value};

/// Current schema version of the `fitnessData` document.
pub const SCHEMA_VERSION: u64 = 1;

/// Brings a raw document up to [`SCHEMA_VERSION`].
///
/// Returns `true` if anything was changed.
pub fn migrate(doc: &mut Value) -> bool {
    let Some(root) = doc.as_object_mut() else {
        *doc = json!({ "version": SCHEMA_VERSION, "logs": [], "streak": 0 });
        return true;
    };

    let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version >= SCHEMA_VERSION {
        return false;
    }

    if version < 1 {
        migrate_v0_to_v1(root);
    }

    root.insert("version".to_string(), json!(SCHEMA_VERSION));
    true
}

fn migrate_v0_to_v1(root: &mut Map<String, Value>) {
    let logs = match root.remove("logs") {
        Some(Value::Array(logs)) => logs,
        _ => Vec::new(),
    };

    // Last write for a date wins, first position is kept.
    let mut merged: Vec<Map<String, Value>> = Vec::with_capacity(logs.len());
    for log in logs {
        let Value::Object(mut entry) = log else {
            continue;
        };
        let Some(date) = entry.get("date").and_then(Value::as_str).map(str::to_owned) else {
            continue;
        };
        repair_entry(&mut entry, &date);

        match merged
            .iter_mut()
            .find(|e| e.get("date").and_then(Value::as_str) == Some(date.as_str()))
        {
            Some(existing) => *existing = entry,
            None => merged.push(entry),
        }
    }

    root.insert(
        "logs".to_string(),
        Value::Array(merged.into_iter().map(Value::Object).collect()),
    );
    if !root.get("streak").is_some_and(Value::is_u64) {
        root.insert("streak".to_string(), json!(0));
    }
}

fn repair_entry(entry: &mut Map<String, Value>, date: &str) {
    let defaults = [
        ("workoutCompleted", json!(false)),
        ("waterIntake", json!(0)),
        ("exerciseLogs", json!([])),
        ("exercisePerformance", json!({})),
        ("meals", json!([])),
    ];
    for (field, default) in defaults {
        if entry.get(field).map_or(true, Value::is_null) {
            entry.insert(field.to_string(), default);
        }
    }

    let nutrition = entry
        .entry("nutritionConsumed")
        .or_insert_with(|| json!({}));
    if !nutrition.is_object() {
        *nutrition = json!({});
    }
    if let Some(macros) = nutrition.as_object_mut() {
        for field in ["calories", "protein", "carbs", "fat"] {
            if !macros.get(field).is_some_and(Value::is_number) {
                macros.insert(field.to_string(), json!(0));
            }
        }
    }

    if !entry.get("updatedAt").is_some_and(Value::is_string) {
        entry.insert(
            "updatedAt".to_string(),
            json!(format!("{}T00:00:00Z", date)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_is_untouched() {
        let mut doc = json!({ "version": SCHEMA_VERSION, "logs": [], "streak": 3 });
        assert!(!migrate(&mut doc));
        assert_eq!(doc["streak"], 3);
    }

    #[test]
    fn test_legacy_entry_gets_defaults() {
        let mut doc = json!({
            "logs": [{
                "date": "2024-01-01",
                "workoutCompleted": true,
                "nutritionConsumed": { "calories": 1800 },
                "bodyWeight": 176
            }],
            "streak": 1,
            "startDate": "2024-01-01T08:00:00.000Z"
        });

        assert!(migrate(&mut doc));

        let entry = &doc["logs"][0];
        assert_eq!(doc["version"], SCHEMA_VERSION);
        assert_eq!(entry["waterIntake"], 0);
        assert_eq!(entry["exerciseLogs"], json!([]));
        assert_eq!(entry["meals"], json!([]));
        assert_eq!(entry["nutritionConsumed"]["calories"], 1800);
        assert_eq!(entry["nutritionConsumed"]["protein"], 0);
        assert_eq!(entry["updatedAt"], "2024-01-01T00:00:00Z");
        assert_eq!(doc["streak"], 1);
    }

    #[test]
    fn test_duplicate_dates_keep_last_write_at_first_position() {
        let mut doc = json!({
            "logs": [
                { "date": "2024-01-01", "waterIntake": 1 },
                { "date": "2024-01-02", "waterIntake": 2 },
                { "date": "2024-01-01", "waterIntake": 5 }
            ]
        });

        migrate(&mut doc);

        let logs = doc["logs"].as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["date"], "2024-01-01");
        assert_eq!(logs[0]["waterIntake"], 5);
        assert_eq!(logs[1]["date"], "2024-01-02");
    }

    #[test]
    fn test_entries_without_date_are_dropped() {
        let mut doc = json!({ "logs": [{ "waterIntake": 1 }, 42] });
        migrate(&mut doc);
        assert_eq!(doc["logs"], json!([]));
        assert_eq!(doc["streak"], 0);
    }

    #[test]
    fn test_non_object_document_is_replaced() {
        let mut doc = json!("garbage");
        assert!(migrate(&mut doc));
        assert_eq!(doc["logs"], json!([]));
    }
}
