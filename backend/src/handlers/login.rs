use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::{LoginError, LoginResult};
use crate::lookup::{lookup, LookupResult};
use crate::AppState;
use shared::api::{LoginRequest, LoginResponse};
use shared::models::InvalidCredential;

/// Authenticate a username/phone pair against the user sheet.
///
/// The payload is validated for presence before the sheet is fetched. A
/// non-string username or phone can never match and fails as unauthorized.
/// The sheet is read fresh on every call and the matched row is projected
/// according to the configured profile fields.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> LoginResult<Json<LoginResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected login payload: {}", rejection);
        LoginError::InvalidPayload
    })?;

    tracing::info!(
        username = request.username_text().unwrap_or_default(),
        "Login attempt"
    );

    let credential = request.credential().map_err(|e| match e {
        InvalidCredential::Missing(_) => {
            tracing::warn!("Missing username or phone number in request body: {}", e);
            LoginError::InvalidPayload
        }
        InvalidCredential::NotText(_) => {
            tracing::warn!("Authentication failed: {}", e);
            LoginError::InvalidCredentials
        }
    })?;

    let rows = state.rows.fetch_rows().await?;
    tracing::info!(rows = rows.len(), "Fetched data from Google Sheets");

    if rows.is_empty() {
        tracing::warn!("No data found in the spreadsheet");
        return Err(LoginError::EmptySheet);
    }

    match lookup(&rows, &credential) {
        LookupResult::Found(record) => {
            tracing::info!(username = %record.username, "User authenticated successfully");
            Ok(Json(LoginResponse::success(
                "Login successful!",
                state.projection.project(&record),
            )))
        }
        LookupResult::NotFound => {
            tracing::warn!(username = %credential.identifier(), "Authentication failed");
            Err(LoginError::InvalidCredentials)
        }
    }
}
