use thiserror::Error;

/// Errors surfaced by the engine and its stores.
///
/// Store failures are wrapped in [`Error::StoreUnavailable`] and handed back
/// unchanged; nothing in the core retries or substitutes cached data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid recommendation category '{0}'. Must be one of: food, exercise, emotional")]
    InvalidCategory(String),

    #[error("Store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable(anyhow::Error::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn validation(message: impl Into<String>) -> Error {
    Error::Validation(message.into())
}
