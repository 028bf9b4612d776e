use super::domain::{Person, PersonId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction so the roster service can run against any backend.
pub trait RosterRepository: Send + Sync {
    fn insert(&self, person: Person) -> Result<Person, RepositoryError>;
    fn update(&self, person: Person) -> Result<(), RepositoryError>;
    fn delete(&self, id: &PersonId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PersonId) -> Result<Option<Person>, RepositoryError>;
    fn list(&self) -> Result<Vec<Person>, RepositoryError>;
}
