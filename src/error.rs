use thiserror::Error;

/// Faults raised by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Faults raised by the message logic layer.
///
/// `NotFound` covers both a lookup that yields no record and an update whose
/// body id mismatches the path id; both surface to callers as the same kind,
/// distinguished only by message.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found() -> Self {
        ServiceError::NotFound("message not found".into())
    }

    pub fn wrong_update_id() -> Self {
        ServiceError::NotFound("updated message does not present the correct id".into())
    }
}
