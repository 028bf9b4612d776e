//! Duty rota generation for a roster of people across weekly slots.
//!
//! The engine lives in [`workflows::rota`]; everything else in this crate
//! (configuration, telemetry, the roster service, revision documents) is the
//! plumbing a service needs around it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
