pub mod account_repo;
pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod flight_repo;

pub use account_repo::{AccountRepository, InfoRepository};
pub use booking_repo::BookingRepository;
pub use catalog_repo::{AirportRepository, ClassRepository};
pub use database::DbClient;
pub use flight_repo::FlightRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to decode row: {0}")]
    Decode(String),
}

impl From<skylane_core::CoreError> for StoreError {
    fn from(err: skylane_core::CoreError) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl StoreError {
    /// The underlying database error, when there is one. Used by the API
    /// layer to classify constraint violations.
    pub fn as_database_error(&self) -> Option<&dyn sqlx::error::DatabaseError> {
        match self {
            StoreError::Sqlx(e) => e.as_database_error(),
            StoreError::Decode(_) => None,
        }
    }
}
