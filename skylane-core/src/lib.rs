pub mod account;
pub mod booking;
pub mod catalog;
pub mod password;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Password hashing failed: {0}")]
    PasswordError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
