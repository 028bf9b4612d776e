//! Saved rota documents and the revision stream they are stored in.
//!
//! A revision is a self-contained JSON document: the generation settings plus
//! the (possibly hand-edited) rows. Revisions are grouped by a rota key built
//! from the start date and week count, and numbered from 1 within each key.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use super::domain::WeekRecord;
use crate::workflows::repository::RepositoryError;

pub const SCHEMA_VERSION: u32 = 1;

/// Newest-first page size when listing a key's revisions.
pub const REVISION_LIST_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotaRevision {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,
    pub meta: RevisionMeta,
    pub settings: RevisionSettings,
    pub rows: Vec<RevisionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionMeta {
    #[serde(rename = "savedAtISO")]
    pub saved_at: DateTime<Utc>,
    pub revision: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSettings {
    #[serde(rename = "startDateISO")]
    pub start_date: NaiveDate,
    pub weeks: i64,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRow {
    #[serde(rename = "weekCommencingISO")]
    pub week_commencing: NaiveDate,
    #[serde(
        default,
        serialize_with = "none_as_empty_string",
        deserialize_with = "empty_string_as_none"
    )]
    pub weekend: Option<String>,
    #[serde(
        default,
        serialize_with = "none_as_empty_string",
        deserialize_with = "empty_string_as_none"
    )]
    pub week: Option<String>,
}

impl From<&WeekRecord> for RevisionRow {
    fn from(record: &WeekRecord) -> Self {
        Self {
            week_commencing: record.week_commencing,
            weekend: record.weekend.clone(),
            week: record.week.clone(),
        }
    }
}

impl From<&RevisionRow> for WeekRecord {
    fn from(row: &RevisionRow) -> Self {
        Self {
            week_commencing: row.week_commencing,
            weekend: row.weekend.clone(),
            week: row.week.clone(),
        }
    }
}

fn none_as_empty_string<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("invalid rota document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "unsupported rota document schema version {0} (expected {expected})",
        expected = SCHEMA_VERSION
    )]
    UnsupportedSchema(u32),
    #[error("nothing to save: generate a rota first")]
    EmptyRota,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RotaRevision {
    pub fn new(
        settings: RevisionSettings,
        rows: &[WeekRecord],
        revision: u32,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            meta: RevisionMeta { saved_at, revision },
            settings,
            rows: rows.iter().map(RevisionRow::from).collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, RevisionError> {
        let revision: Self = serde_json::from_str(raw)?;
        if revision.schema_version != SCHEMA_VERSION {
            return Err(RevisionError::UnsupportedSchema(revision.schema_version));
        }
        Ok(revision)
    }

    pub fn to_json_pretty(&self) -> Result<String, RevisionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rows in the shape the engine and the manual edits work on.
    pub fn week_records(&self) -> Vec<WeekRecord> {
        self.rows.iter().map(WeekRecord::from).collect()
    }

    pub fn rota_key(&self) -> String {
        rota_key(self.settings.start_date, self.settings.weeks)
    }
}

/// Grouping key for a revision stream, e.g. `2026-01-02_52`.
pub fn rota_key(start_date: NaiveDate, weeks: i64) -> String {
    format!("{}_{}", start_date.format("%Y-%m-%d"), weeks)
}

/// File name used when a revision is written to disk.
pub fn revision_file_name(revision: u32, saved_at: DateTime<Utc>) -> String {
    format!(
        "rotagen_rev{revision:03}_{}.json",
        saved_at.format("%Y-%m-%d_%H-%M")
    )
}

/// Revision as held by a store, with the bookkeeping the store adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRevision {
    pub rota_key: String,
    pub revision: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub payload: RotaRevision,
}

/// Storage abstraction for saved revisions (a document store in production).
pub trait RevisionRepository: Send + Sync {
    fn latest_revision(&self, rota_key: &str) -> Result<Option<u32>, RepositoryError>;
    fn insert(&self, record: StoredRevision) -> Result<StoredRevision, RepositoryError>;
    /// Newest first, at most `limit` entries.
    fn list(&self, rota_key: &str, limit: usize) -> Result<Vec<StoredRevision>, RepositoryError>;
}

pub struct RevisionService<R> {
    repository: Arc<R>,
}

impl<R> RevisionService<R>
where
    R: RevisionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store `rows` as the next revision of the key derived from `settings`.
    pub fn save(
        &self,
        settings: RevisionSettings,
        rows: &[WeekRecord],
        owner: Option<String>,
        saved_at: DateTime<Utc>,
    ) -> Result<StoredRevision, RevisionError> {
        if rows.is_empty() {
            return Err(RevisionError::EmptyRota);
        }

        let key = rota_key(settings.start_date, settings.weeks);
        let next = self.repository.latest_revision(&key)?.unwrap_or(0) + 1;
        let payload = RotaRevision::new(settings, rows, next, saved_at);

        let stored = self.repository.insert(StoredRevision {
            rota_key: key,
            revision: next,
            created_at: saved_at,
            owner,
            payload,
        })?;
        info!(rota_key = %stored.rota_key, revision = stored.revision, "rota revision saved");
        Ok(stored)
    }

    pub fn list(&self, rota_key: &str) -> Result<Vec<StoredRevision>, RevisionError> {
        Ok(self.repository.list(rota_key, REVISION_LIST_LIMIT)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRevisions {
        records: Mutex<HashMap<String, Vec<StoredRevision>>>,
    }

    impl RevisionRepository for MemoryRevisions {
        fn latest_revision(&self, rota_key: &str) -> Result<Option<u32>, RepositoryError> {
            let guard = self.records.lock().expect("revision mutex poisoned");
            Ok(guard
                .get(rota_key)
                .and_then(|records| records.iter().map(|record| record.revision).max()))
        }

        fn insert(&self, record: StoredRevision) -> Result<StoredRevision, RepositoryError> {
            let mut guard = self.records.lock().expect("revision mutex poisoned");
            guard
                .entry(record.rota_key.clone())
                .or_default()
                .push(record.clone());
            Ok(record)
        }

        fn list(
            &self,
            rota_key: &str,
            limit: usize,
        ) -> Result<Vec<StoredRevision>, RepositoryError> {
            let guard = self.records.lock().expect("revision mutex poisoned");
            let mut records = guard.get(rota_key).cloned().unwrap_or_default();
            records.sort_by(|a, b| b.revision.cmp(&a.revision));
            records.truncate(limit);
            Ok(records)
        }
    }

    fn saved_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 3, 9, 30, 0).unwrap()
    }

    fn settings() -> RevisionSettings {
        RevisionSettings {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date"),
            weeks: 2,
            names: vec!["Ann".into(), "Bob".into(), "Cara".into(), "Dan".into()],
        }
    }

    fn rows() -> Vec<WeekRecord> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date");
        vec![
            WeekRecord::new(start, "Ann", "Bob"),
            WeekRecord {
                week_commencing: start + chrono::Duration::weeks(1),
                weekend: Some("Cara".into()),
                week: None,
            },
        ]
    }

    #[test]
    fn document_uses_persisted_field_names() {
        let revision = RotaRevision::new(settings(), &rows(), 4, saved_at());
        let value = serde_json::to_value(&revision).expect("serializes");

        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["meta"]["revision"], 4);
        assert_eq!(value["settings"]["startDateISO"], "2026-01-02");
        assert_eq!(value["rows"][0]["weekCommencingISO"], "2026-01-02");
        assert_eq!(value["rows"][1]["week"], "");
    }

    #[test]
    fn blank_and_null_assignees_load_as_empty() {
        let raw = r#"{
            "schemaVersion": 1,
            "meta": {"savedAtISO": "2026-01-03T09:30:00Z", "revision": 2},
            "settings": {"startDateISO": "2026-01-02", "weeks": 1, "names": ["Ann"]},
            "rows": [{"weekCommencingISO": "2026-01-02", "weekend": "  ", "week": null}]
        }"#;
        let revision = RotaRevision::from_json(raw).expect("loads");
        let records = revision.week_records();
        assert_eq!(records[0].weekend, None);
        assert_eq!(records[0].week, None);
        assert_eq!(revision.rota_key(), "2026-01-02_1");
    }

    #[test]
    fn unknown_schema_versions_are_rejected() {
        let mut revision = RotaRevision::new(settings(), &rows(), 1, saved_at());
        revision.schema_version = 7;
        let raw = serde_json::to_string(&revision).expect("serializes");

        match RotaRevision::from_json(&raw) {
            Err(RevisionError::UnsupportedSchema(7)) => {}
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let raw = r#"{"schemaVersion":1,"meta":{"savedAtISO":"2026-01-03T09:30:00Z","revision":1},
            "settings":{"startDateISO":"02/01/2026","weeks":1,"names":[]},"rows":[]}"#;
        assert!(matches!(
            RotaRevision::from_json(raw),
            Err(RevisionError::Json(_))
        ));
    }

    #[test]
    fn file_name_pads_revision_and_stamps_time() {
        assert_eq!(
            revision_file_name(7, saved_at()),
            "rotagen_rev007_2026-01-03_09-30.json"
        );
    }

    #[test]
    fn service_numbers_revisions_per_key() {
        let service = RevisionService::new(Arc::new(MemoryRevisions::default()));

        let first = service
            .save(settings(), &rows(), None, saved_at())
            .expect("first save");
        let second = service
            .save(settings(), &rows(), Some("ops".into()), saved_at())
            .expect("second save");
        let mut other_settings = settings();
        other_settings.weeks = 10;
        let other = service
            .save(other_settings, &rows(), None, saved_at())
            .expect("other key");

        assert_eq!(first.revision, 1);
        assert_eq!(second.revision, 2);
        assert_eq!(second.payload.meta.revision, 2);
        assert_eq!(other.revision, 1);
        assert_eq!(other.rota_key, "2026-01-02_10");

        let listed = service.list("2026-01-02_2").expect("list");
        let revisions: Vec<u32> = listed.iter().map(|record| record.revision).collect();
        assert_eq!(revisions, vec![2, 1]);
    }

    #[test]
    fn service_refuses_empty_rota() {
        let service = RevisionService::new(Arc::new(MemoryRevisions::default()));
        assert!(matches!(
            service.save(settings(), &[], None, saved_at()),
            Err(RevisionError::EmptyRota)
        ));
    }
}
