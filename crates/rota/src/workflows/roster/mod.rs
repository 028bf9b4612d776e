//! Roster of people available for duty, plus its HTTP surface.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{NewPerson, Person, PersonId, PersonPatch};
pub use repository::RosterRepository;
pub use router::roster_router;
pub use service::{RosterError, RosterService};
