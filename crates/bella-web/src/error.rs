//! Mapping from service errors to HTTP responses.

use axum::{
    http::{header, HeaderName, StatusCode},
    Json,
};
use bella_core::{BellaError, ErrorKind};
use uuid::Uuid;

/// Error half of every handler result: a status and a plain-text message.
pub type ApiError = (StatusCode, String);

/// Success half of a create handler: `201 Created` with a `Location` header.
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

/// Translate a service error into a response.
pub fn api_error(err: BellaError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ReferenceNotFound
        | ErrorKind::CrossAggregateMismatch
        | ErrorKind::ValidationFailure
        | ErrorKind::ReferenceInUse => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => {
            tracing::error!(error = %err, "Storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

/// Parse a path ID. Malformed IDs cannot name a record, so they are 404s.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| (StatusCode::NOT_FOUND, format!("Unknown id: {}", raw)))
}

pub fn created<T>(collection: &str, id: Uuid, body: T) -> Created<T> {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/{}/{}", collection, id))],
        Json(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(api_error(BellaError::not_found("Order", 1)).0, StatusCode::NOT_FOUND);
        assert_eq!(api_error(BellaError::CustomerMismatch).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error(BellaError::ReferenceInUse("fk".into())).0,
            StatusCode::BAD_REQUEST
        );
        let (status, body) = api_error(BellaError::CustomerNotFound);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Cliente não encontrado.");
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        assert_eq!(parse_id("abc").unwrap_err().0, StatusCode::NOT_FOUND);
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
