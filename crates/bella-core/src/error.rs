//! Centralized error types for Bella.

use bella_db::DbError;
use thiserror::Error;

/// Main error type for Bella operations.
#[derive(Error, Debug)]
pub enum BellaError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Cliente não encontrado.")]
    CustomerNotFound,

    #[error("Pedido não encontrado.")]
    OrderNotFound,

    #[error("Produto não encontrado.")]
    ProductNotFound,

    #[error("Um ou mais produtos informados não foram encontrados.")]
    InvalidProducts,

    #[error("O cliente informado não corresponde ao pedido.")]
    CustomerMismatch,

    #[error("Um ou mais itens informados não pertencem ao pedido.")]
    ForeignOrderItems,

    #[error("{0}")]
    Validation(String),

    #[error("Registro em uso: {0}")]
    ReferenceInUse(String),

    #[error("Database error: {0}")]
    Database(DbError),
}

/// Coarse classification of [`BellaError`], used by the API layer to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ReferenceNotFound,
    CrossAggregateMismatch,
    ValidationFailure,
    ReferenceInUse,
    Storage,
}

/// Result type for Bella operations.
pub type BellaResult<T> = Result<T, BellaError>;

impl BellaError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not-found error for `entity` with `id`.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", entity, id))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::CustomerNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::InvalidProducts => ErrorKind::ReferenceNotFound,
            Self::CustomerMismatch | Self::ForeignOrderItems => ErrorKind::CrossAggregateMismatch,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::ReferenceInUse(_) => ErrorKind::ReferenceInUse,
            Self::Database(_) => ErrorKind::Storage,
        }
    }
}

/// Parse an enum column read back from storage. Unknown values are a
/// storage fault.
pub(crate) fn parse_stored<T: std::str::FromStr>(column: &str, raw: &str) -> BellaResult<T> {
    raw.parse().map_err(|_| {
        tracing::warn!(column, value = raw, "Unknown stored value");
        BellaError::Database(DbError::InvalidValue(format!("{} = {:?}", column, raw)))
    })
}

impl From<DbError> for BellaError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => Self::NotFound(what),
            DbError::ForeignKeyViolation(what) => Self::ReferenceInUse(what),
            other => Self::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for BellaError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_are_classified() {
        let missing: BellaError = DbError::NotFound("Order: 1".into()).into();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let in_use: BellaError = DbError::ForeignKeyViolation("fk".into()).into();
        assert_eq!(in_use.kind(), ErrorKind::ReferenceInUse);

        let storage: BellaError = DbError::Poisoned.into();
        assert_eq!(storage.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_business_rule_messages() {
        assert_eq!(BellaError::CustomerNotFound.to_string(), "Cliente não encontrado.");
        assert_eq!(BellaError::InvalidProducts.kind(), ErrorKind::ReferenceNotFound);
        assert_eq!(
            BellaError::ForeignOrderItems.kind(),
            ErrorKind::CrossAggregateMismatch
        );
    }
}
