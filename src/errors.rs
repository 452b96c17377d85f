use std::fmt;

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

/// Everything a request handler can fail with. Data-access code returns this
/// directly so the HTTP mapping lives in one place instead of being repeated
/// per handler.
#[derive(Debug)]
pub enum ApiError {
    /// A referenced resource does not exist; carries the resource kind.
    NotFound(&'static str),
    /// Duplicate email or duplicate booking pair.
    Conflict(String),
    /// Malformed request field.
    Validation(String),
    Database(diesel::result::Error),
    Pool(r2d2::Error),
    Canceled,
}

impl ApiError {
    pub fn not_found(kind: &'static str) -> Self {
        ApiError::NotFound(kind)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(kind) => write!(f, "{} not found", kind),
            ApiError::Conflict(message) | ApiError::Validation(message) => f.write_str(message),
            ApiError::Database(e) => write!(f, "database error: {}", e),
            ApiError::Pool(e) => write!(f, "connection pool error: {}", e),
            ApiError::Canceled => f.write_str("blocking operation was canceled"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Pool(e) => Some(e),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Canceled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {}", self);
            return HttpResponse::build(status).json(json!({ "message": "internal server error" }));
        }
        HttpResponse::build(status).json(json!({ "message": self.to_string() }))
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        ApiError::Database(e)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(e: r2d2::Error) -> Self {
        ApiError::Pool(e)
    }
}

impl From<BlockingError> for ApiError {
    fn from(_: BlockingError) -> Self {
        ApiError::Canceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_and_names_the_resource() {
        let err = ApiError::not_found("Conference");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Conference not found");
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = ApiError::conflict("employee is already booked into this conference");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_422() {
        let err = ApiError::validation("name must not be empty");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_failures_map_to_500() {
        let err = ApiError::from(diesel::result::Error::BrokenTransactionManager);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Canceled.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
