use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{NewPerson, Person, PersonId, PersonPatch};
use super::repository::RosterRepository;
use crate::workflows::repository::RepositoryError;

/// Service wrapping roster storage with the naming rules.
pub struct RosterService<R> {
    repository: Arc<R>,
}

static PERSON_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_person_id() -> PersonId {
    let id = PERSON_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PersonId(format!("person-{id:06}"))
}

fn clean_name(raw: &str) -> Result<String, RosterError> {
    let name = raw.trim();
    if name.is_empty() {
        Err(RosterError::NameRequired)
    } else {
        Ok(name.to_string())
    }
}

impl<R> RosterService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn add(&self, person: NewPerson) -> Result<Person, RosterError> {
        let name = clean_name(&person.name)?;
        let now = Utc::now();
        let record = Person {
            id: next_person_id(),
            name,
            phone: person.phone.as_deref().unwrap_or("").trim().to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(person_id = %stored.id.0, name = %stored.name, "person added to roster");
        Ok(stored)
    }

    pub fn update(&self, id: &PersonId, patch: PersonPatch) -> Result<Person, RosterError> {
        let mut person = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        if patch.is_empty() {
            return Ok(person);
        }

        if let Some(name) = patch.name.as_deref() {
            person.name = clean_name(name)?;
        }
        if let Some(phone) = patch.phone.as_deref() {
            person.phone = phone.trim().to_string();
        }
        if let Some(active) = patch.active {
            person.active = active;
        }
        person.updated_at = Utc::now();

        self.repository.update(person.clone())?;
        Ok(person)
    }

    pub fn delete(&self, id: &PersonId) -> Result<(), RosterError> {
        self.repository.delete(id)?;
        info!(person_id = %id.0, "person removed from roster");
        Ok(())
    }

    /// Everyone on the roster, ordered by name.
    pub fn list(&self) -> Result<Vec<Person>, RosterError> {
        let mut people = self.repository.list()?;
        people.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(people)
    }

    /// Names of active people, ready to feed into rota generation.
    pub fn active_names(&self) -> Result<Vec<String>, RosterError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|person| person.active)
            .map(|person| person.name)
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("name is required")]
    NameRequired,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
