use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skylane_store::StoreError;
use sqlx::error::ErrorKind;

#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed or expired token.
    Unauthenticated(String),
    /// Authenticated, but not the owner of the path account.
    Forbidden(String),
    /// Malformed or constraint-violating input.
    Validation(String),
    NotFound(String),
    InternalServerError(String),
}

impl AppError {
    pub fn account_not_found(account_id: i32) -> Self {
        AppError::NotFound(format!("Account with id {account_id} was not found"))
    }

    pub fn info_not_found() -> Self {
        AppError::NotFound("Account info was not found".to_string())
    }

    pub fn airport_not_found(airport_id: i32) -> Self {
        AppError::NotFound(format!("Airport with id {airport_id} was not found"))
    }

    pub fn class_not_found(class_id: i32) -> Self {
        AppError::NotFound(format!("Flight class with id {class_id} was not found"))
    }

    pub fn booking_not_found(booking_id: i32) -> Self {
        AppError::NotFound(format!("Booking with id {booking_id} was not found"))
    }

    pub fn flight_not_found(flight_id: i32) -> Self {
        AppError::NotFound(format!("Flight with id {flight_id} was not found"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "detail": detail,
        }));

        (status, body).into_response()
    }
}

/// Storage failures are classified here once: declared constraints carry
/// caller mistakes and map to 400, everything else is a 500. Domain errors
/// (403/404) never travel through this path.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    let msg = match constraint {
                        "accounts_email_key" => "Account with this email already exists",
                        "accounts_info_account_id_key" => {
                            "Account info already exists for this account"
                        }
                        "classes_type_key" => "Flight class with this type already exists",
                        _ => "Resource already exists",
                    };
                    return AppError::Validation(msg.to_string());
                }
                ErrorKind::CheckViolation => {
                    let msg = match constraint {
                        "different_locations" => {
                            "Departure and destination airports must be different"
                        }
                        "departure_before_return" => {
                            "Departure date must precede the return date"
                        }
                        _ => "Input violates a data constraint",
                    };
                    return AppError::Validation(msg.to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return AppError::Validation(
                        "Referenced resource does not exist".to_string(),
                    );
                }
                _ => {}
            }
        }
        AppError::InternalServerError(err.to_string())
    }
}

/// Transaction begin/commit surface raw sqlx errors; same classification.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(StoreError::from(err))
    }
}

impl From<skylane_core::CoreError> for AppError {
    fn from(err: skylane_core::CoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::Unauthenticated("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalServerError("boom".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_messages_interpolate_the_id() {
        match AppError::booking_not_found(42) {
            AppError::NotFound(msg) => {
                assert_eq!(msg, "Booking with id 42 was not found")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
