//! Error handling for the login endpoint.
//!
//! Every failure maps to a fixed status code and a `LoginResponse` body, so
//! handlers can use `?` and callers never see upstream error details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::LoginResponse;
use thiserror::Error;

use crate::sheets::SheetsError;

#[derive(Debug, Error)]
pub enum LoginError {
    /// Body missing, not JSON, or without a username/phone
    #[error("Invalid request payload")]
    InvalidPayload,

    /// No row matched the submitted credential
    #[error("Invalid username or phone number")]
    InvalidCredentials,

    /// The sheet returned no rows at all
    #[error("No data found in the spreadsheet")]
    EmptySheet,

    /// Fetching rows from the sheet failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] SheetsError),
}

impl LoginError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LoginError::InvalidPayload => StatusCode::BAD_REQUEST,
            LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LoginError::EmptySheet => StatusCode::NOT_FOUND,
            LoginError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let body = match &self {
            LoginError::Upstream(e) => {
                tracing::error!("Error during login process: {:?}", e);
                LoginResponse::error("Internal server error")
            }
            other => LoginResponse::fail(other.to_string()),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for login handlers
pub type LoginResult<T> = Result<T, LoginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LoginError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(LoginError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(LoginError::EmptySheet.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            LoginError::Upstream(SheetsError::MissingToken).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_details_not_exposed() {
        let response = LoginError::Upstream(SheetsError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "caller does not have permission".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
