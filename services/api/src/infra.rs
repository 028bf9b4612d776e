use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rota::workflows::repository::RepositoryError;
use rota::workflows::roster::{Person, PersonId, RosterRepository};
use rota::workflows::rota::{DutyType, RevisionRepository, SlotRef, StoredRevision};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterRepository {
    people: Arc<Mutex<HashMap<PersonId, Person>>>,
}

impl RosterRepository for InMemoryRosterRepository {
    fn insert(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut guard = self.people.lock().map_err(poisoned)?;
        if guard.contains_key(&person.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    fn update(&self, person: Person) -> Result<(), RepositoryError> {
        let mut guard = self.people.lock().map_err(poisoned)?;
        if guard.contains_key(&person.id) {
            guard.insert(person.id.clone(), person);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: &PersonId) -> Result<(), RepositoryError> {
        let mut guard = self.people.lock().map_err(poisoned)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &PersonId) -> Result<Option<Person>, RepositoryError> {
        let guard = self.people.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Person>, RepositoryError> {
        let guard = self.people.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

/// Revision streams keyed by rota key, oldest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRevisionRepository {
    streams: Arc<Mutex<HashMap<String, Vec<StoredRevision>>>>,
}

impl RevisionRepository for InMemoryRevisionRepository {
    fn latest_revision(&self, rota_key: &str) -> Result<Option<u32>, RepositoryError> {
        let guard = self.streams.lock().map_err(poisoned)?;
        Ok(guard
            .get(rota_key)
            .and_then(|stream| stream.iter().map(|record| record.revision).max()))
    }

    fn insert(&self, record: StoredRevision) -> Result<StoredRevision, RepositoryError> {
        let mut guard = self.streams.lock().map_err(poisoned)?;
        let stream = guard.entry(record.rota_key.clone()).or_default();
        if stream.iter().any(|existing| existing.revision == record.revision) {
            return Err(RepositoryError::Conflict);
        }
        stream.push(record.clone());
        Ok(record)
    }

    fn list(&self, rota_key: &str, limit: usize) -> Result<Vec<StoredRevision>, RepositoryError> {
        let guard = self.streams.lock().map_err(poisoned)?;
        let mut records = guard.get(rota_key).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.revision.cmp(&a.revision));
        records.truncate(limit);
        Ok(records)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses `WEEK:DUTY` with a 1-based week number, e.g. `3:weekend`.
pub(crate) fn parse_slot(raw: &str) -> Result<SlotRef, String> {
    let (week, duty) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected WEEK:DUTY, got '{raw}'"))?;
    let week = week
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|week| *week > 0)
        .ok_or_else(|| format!("week in '{raw}' must be a positive number"))?;
    let duty = match duty.trim().to_ascii_lowercase().as_str() {
        "weekend" => DutyType::Weekend,
        "week" => DutyType::Week,
        other => return Err(format!("unknown duty '{other}' (expected weekend or week)")),
    };
    Ok(SlotRef::new(week - 1, duty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_slot_converts_to_zero_based_weeks() {
        assert_eq!(
            parse_slot("3:Weekend"),
            Ok(SlotRef::new(2, DutyType::Weekend))
        );
        assert_eq!(parse_slot(" 1 : week "), Ok(SlotRef::new(0, DutyType::Week)));
    }

    #[test]
    fn parse_slot_rejects_bad_input() {
        assert!(parse_slot("0:week").is_err());
        assert!(parse_slot("2").is_err());
        assert!(parse_slot("2:night").is_err());
    }

    #[test]
    fn revision_list_is_newest_first_and_limited() {
        use chrono::Utc;
        use rota::workflows::rota::{RevisionSettings, RotaRevision};

        let repository = InMemoryRevisionRepository::default();
        let settings = RevisionSettings {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date"),
            weeks: 4,
            names: vec!["Ann".into()],
        };
        for revision in 1..=3 {
            let payload = RotaRevision::new(settings.clone(), &[], revision, Utc::now());
            repository
                .insert(StoredRevision {
                    rota_key: "2026-01-02_4".into(),
                    revision,
                    created_at: Utc::now(),
                    owner: None,
                    payload,
                })
                .expect("inserted");
        }

        assert_eq!(
            repository.latest_revision("2026-01-02_4").expect("latest"),
            Some(3)
        );
        let listed = repository.list("2026-01-02_4", 2).expect("list");
        let revisions: Vec<u32> = listed.iter().map(|record| record.revision).collect();
        assert_eq!(revisions, vec![3, 2]);
        assert!(repository.list("missing", 5).expect("list").is_empty());
    }
}
