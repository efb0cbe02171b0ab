//! In-memory record store behind the stand-in API.
//!
//! Records are kept as JSON objects in insertion order, one collection per
//! resource name. The store knows nothing about entity shapes beyond the
//! `id`, `createdAt` and `name` fields.

use jiff::Timestamp;
use payloads::responses::{Paginated, ReportSummary};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

pub type Record = Map<String, Value>;

pub const RESOURCES: &[&str] = &[
    "categories",
    "awards",
    "criteria",
    "media-channels",
    "users",
    "applications",
    "scores",
];

/// Resources whose `name` must be unique.
const UNIQUE_NAMES: &[&str] = &["categories", "awards", "media-channels"];

/// Query keys that control listing rather than filter records.
const RESERVED_KEYS: &[&str] = &["search", "page", "perPage", "delay_ms"];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown resource `{0}`")]
    UnknownResource(String),
    #[error("Record not found")]
    RecordNotFound,
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Name is required")]
    NameRequired,
    #[error("Name is already taken")]
    DuplicateName,
    #[error("Identifier must not appear in the request body")]
    IdentifierInBody,
}

#[derive(Debug)]
pub struct Store {
    collections: HashMap<String, Vec<Record>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let collections = RESOURCES
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Self { collections }
    }

    fn collection(&self, resource: &str) -> Result<&Vec<Record>, StoreError> {
        self.collections
            .get(resource)
            .ok_or_else(|| StoreError::UnknownResource(resource.to_string()))
    }

    fn collection_mut(
        &mut self,
        resource: &str,
    ) -> Result<&mut Vec<Record>, StoreError> {
        self.collections
            .get_mut(resource)
            .ok_or_else(|| StoreError::UnknownResource(resource.to_string()))
    }

    /// One page of records matching `query`.
    ///
    /// `search` matches any string field case-insensitively; every other
    /// non-reserved key must equal the record's field.
    pub fn list(
        &self,
        resource: &str,
        query: &HashMap<String, String>,
    ) -> Result<Paginated<Value>, StoreError> {
        let records = self.collection(resource)?;
        let search = query
            .get("search")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        let page = parse_at_least_one(query.get("page"), 1);
        let per_page = parse_at_least_one(query.get("perPage"), 10);
        let filters: Vec<(&String, &String)> = query
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .collect();

        let matching: Vec<&Record> = records
            .iter()
            .filter(|record| search.is_empty() || matches_search(record, &search))
            .filter(|record| {
                filters.iter().all(|(key, value)| {
                    record
                        .get(key.as_str())
                        .is_some_and(|field| field_text(field) == **value)
                })
            })
            .collect();

        let skip = (page as usize - 1) * per_page as usize;
        let data = matching
            .iter()
            .skip(skip)
            .take(per_page as usize)
            .map(|record| Value::Object((*record).clone()))
            .collect();

        Ok(Paginated {
            data,
            total: matching.len() as u64,
            page,
            per_page,
        })
    }

    pub fn get(&self, resource: &str, id: &str) -> Result<Record, StoreError> {
        self.collection(resource)?
            .iter()
            .find(|record| record_id(record) == Some(id))
            .cloned()
            .ok_or(StoreError::RecordNotFound)
    }

    /// Store a new record, assigning `id` and `createdAt` when absent.
    pub fn insert(
        &mut self,
        resource: &str,
        body: Value,
    ) -> Result<Record, StoreError> {
        let Value::Object(mut record) = body else {
            return Err(StoreError::NotAnObject);
        };
        let unique = UNIQUE_NAMES.contains(&resource);
        let records = self.collection_mut(resource)?;
        check_name(records, &record, None, unique)?;

        record
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        record
            .entry("createdAt")
            .or_insert_with(|| Value::String(Timestamp::now().to_string()));
        records.push(record.clone());
        Ok(record)
    }

    /// Merge `body` into an existing record. The body may not carry the
    /// identifier; it belongs in the path.
    pub fn patch(
        &mut self,
        resource: &str,
        id: &str,
        body: Value,
    ) -> Result<Record, StoreError> {
        let Value::Object(changes) = body else {
            return Err(StoreError::NotAnObject);
        };
        if changes.contains_key("id") {
            return Err(StoreError::IdentifierInBody);
        }
        let unique = UNIQUE_NAMES.contains(&resource);
        let records = self.collection_mut(resource)?;
        check_name(records, &changes, Some(id), unique)?;

        let record = records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
            .ok_or(StoreError::RecordNotFound)?;
        record.extend(changes);
        Ok(record.clone())
    }

    pub fn delete(&mut self, resource: &str, id: &str) -> Result<(), StoreError> {
        let records = self.collection_mut(resource)?;
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));
        if records.len() == before {
            return Err(StoreError::RecordNotFound);
        }
        Ok(())
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |resource: &str| {
            self.collections
                .get(resource)
                .map_or(0, |records| records.len() as u64)
        };
        let judges = self.collections.get("users").map_or(0, |users| {
            users
                .iter()
                .filter(|user| user.get("role") == Some(&Value::from("judge")))
                .count() as u64
        });

        ReportSummary {
            categories: count("categories"),
            awards: count("awards"),
            applications: count("applications"),
            judges,
            scores: count("scores"),
        }
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn matches_search(record: &Record, search: &str) -> bool {
    record.iter().any(|(key, value)| {
        key != "id"
            && value
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(search))
    })
}

fn parse_at_least_one(value: Option<&String>, default: u32) -> u32 {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
        .max(1)
}

/// Names must be non-empty, and unique within the resource if `unique`.
fn check_name(
    records: &[Record],
    body: &Record,
    exclude_id: Option<&str>,
    unique: bool,
) -> Result<(), StoreError> {
    let Some(Value::String(name)) = body.get("name") else {
        return Ok(());
    };
    if name.trim().is_empty() {
        return Err(StoreError::NameRequired);
    }
    if !unique {
        return Ok(());
    }
    let taken = records.iter().any(|record| {
        record_id(record) != exclude_id
            && record
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|existing| existing.eq_ignore_ascii_case(name))
    });
    if taken {
        return Err(StoreError::DuplicateName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn seeded() -> Store {
        let mut store = Store::new();
        for name in ["Print", "Radio", "Television", "Online", "Photo"] {
            store
                .insert("categories", json!({ "name": name, "tier": "main" }))
                .unwrap();
        }
        store
    }

    #[test]
    fn pages_and_totals() {
        let store = seeded();

        let page = store
            .list("categories", &query(&[("page", "2"), ("perPage", "2")]))
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0]["name"], "Television");
    }

    #[test]
    fn search_and_filters() {
        let mut store = seeded();
        store
            .insert("categories", json!({ "name": "Radio Features", "tier": "special" }))
            .unwrap();

        let found = store
            .list("categories", &query(&[("search", "RADIO")]))
            .unwrap();
        assert_eq!(found.total, 2);

        let filtered = store
            .list("categories", &query(&[("search", "radio"), ("tier", "special")]))
            .unwrap();
        assert_eq!(filtered.total, 1);
    }

    #[test]
    fn patch_rejects_identifier_in_body() {
        let mut store = seeded();
        let id = store.list("categories", &HashMap::new()).unwrap().data[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let result = store.patch("categories", &id, json!({ "id": id.clone(), "name": "Print" }));

        assert!(matches!(result, Err(StoreError::IdentifierInBody)));
    }

    #[test]
    fn duplicate_and_empty_names() {
        let mut store = seeded();

        assert!(matches!(
            store.insert("categories", json!({ "name": "radio" })),
            Err(StoreError::DuplicateName)
        ));
        assert!(matches!(
            store.insert("categories", json!({ "name": " " })),
            Err(StoreError::NameRequired)
        ));
        store.insert("criteria", json!({ "name": "Impact" })).unwrap();
        store.insert("criteria", json!({ "name": "Impact" })).unwrap();
    }

    #[test]
    fn unknown_resource() {
        let store = Store::new();
        assert!(matches!(
            store.list("trophies", &HashMap::new()),
            Err(StoreError::UnknownResource(_))
        ));
    }
}
