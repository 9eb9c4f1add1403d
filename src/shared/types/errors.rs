use thiserror::Error;

/// Errors surfaced by user use-cases.
///
/// The `Display` text is the message returned to API clients, so it must
/// never carry internal detail. Internal failures keep their cause in the
/// payload for logging only.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidData(String),

    #[error("Internal server error")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: &str) -> Self {
        DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn duplicate_user() -> Self {
        DomainError::Conflict("Duplicate user".into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Internal(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
