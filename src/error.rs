use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Request-terminal error taxonomy. Client-caused failures map to 400 with
/// their message; store and internal failures map to 500 with a public
/// message while the underlying error goes to the log only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Deliberately generic credential/OTP failures (anti-enumeration).
    #[error("{0}")]
    Auth(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{public}")]
    Store {
        public: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("{public}")]
    Internal {
        public: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn store(public: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Store { public, source }
    }

    pub fn internal(public: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Internal { public, source }
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Auth(msg) | ApiError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.to_string())
            }
            ApiError::Store { public, source } => {
                error!(error = %source, "store error");
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
            ApiError::Internal { public, source } => {
                error!(error = %source, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            ApiError::Validation("Image upload is required".into()),
            ApiError::Auth("Invalid credentials"),
            ApiError::Conflict("User already exists"),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_errors_map_to_500_with_public_message_only() {
        let err = ApiError::store("Error generating OTP")(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
