pub mod repository;
pub mod roster;
pub mod rota;

pub use repository::RepositoryError;
