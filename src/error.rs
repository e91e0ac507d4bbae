// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });
                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }
                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert component error types to ApiError

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                tracing::error!("Database unavailable: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            sqlx::Error::Database(dbe) => match dbe.code().as_deref() {
                // unique_violation
                Some("23505") => ApiError::conflict("A record with these unique values already exists"),
                // foreign_key_violation
                Some("23503") => ApiError::bad_request("Referenced record does not exist"),
                _ => {
                    // Don't expose internal SQL errors to clients
                    tracing::error!("Database error: {}", err);
                    ApiError::internal_server_error("An error occurred while processing your request")
                }
            },
            _ => {
                tracing::error!("SQLx error: {}", err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::database::registry::RegistryError> for ApiError {
    fn from(err: crate::database::registry::RegistryError) -> Self {
        use crate::database::registry::RegistryError;
        match err {
            RegistryError::UnknownTenant(key) => {
                ApiError::not_found(format!("Unknown gym: {}", key))
            }
            RegistryError::InvalidDatabaseUrl => {
                tracing::error!("Invalid database URL in configuration");
                ApiError::internal_server_error("Server database configuration error")
            }
        }
    }
}

impl From<crate::database::provisioner::ProvisionError> for ApiError {
    fn from(err: crate::database::provisioner::ProvisionError) -> Self {
        use crate::database::provisioner::ProvisionError;
        match err {
            ProvisionError::InvalidKey(msg) => ApiError::bad_request(msg),
            ProvisionError::Registry(e) => e.into(),
            ProvisionError::CreateDatabase(..) | ProvisionError::Timeout(_) => {
                tracing::error!("Provisioning failed: {}", err);
                ApiError::service_unavailable("Gym database could not be provisioned")
            }
            ProvisionError::Connect(..) | ProvisionError::Migrate(..) => {
                tracing::error!("Tenant database unavailable: {}", err);
                ApiError::service_unavailable("Gym database temporarily unavailable")
            }
        }
    }
}

impl From<crate::services::gym_service::GymError> for ApiError {
    fn from(err: crate::services::gym_service::GymError) -> Self {
        use crate::services::gym_service::GymError;
        match err {
            GymError::AlreadyExists(key) => {
                ApiError::conflict(format!("Gym already exists: {}", key))
            }
            GymError::AdminNotFound(id) => {
                ApiError::bad_request(format!("Admin user not found: {}", id))
            }
            GymError::Provision(e) => e.into(),
            GymError::Database(e) => e.into(),
        }
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        use crate::auth::AuthError;
        match err {
            AuthError::MissingSecret => {
                tracing::error!("JWT secret not configured");
                ApiError::internal_server_error("Authentication is not configured")
            }
            AuthError::Token(_) | AuthError::WrongKind(_) => {
                ApiError::unauthorized("Invalid or expired token")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::registry::RegistryError;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::conflict("x").status_code(), 409);
        assert_eq!(ApiError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn unknown_tenant_maps_to_404() {
        let err: ApiError = RegistryError::UnknownTenant("ghost".to_string()).into();
        assert_eq!(err.status_code(), 404);
        assert!(err.message().contains("ghost"));
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn error_body_has_code_and_message() {
        let body = ApiError::not_found("Member not found").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "Member not found");
    }
}
