use anyhow::{Context, Result};
use serde::Deserialize;
use shared::models::ProfileProjection;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SHEET_RANGE: &str = "Sheet1!A:I";
pub const DEFAULT_CORS_ORIGIN: &str = "https://infinitumlive.com";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_SHEETS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub service_account_json: String,
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub sheets_api_base: String,
    pub sheets_timeout: Duration,
    pub cors_allowed_origin: String,
    pub profile_projection: ProfileProjection,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVICE_ACCOUNT_JSON is not a valid service account key: {0}")]
    ServiceAccountJson(#[from] serde_json::Error),

    #[error("Invalid private key detected in SERVICE_ACCOUNT_JSON")]
    PrivateKeyFormat,
}

#[derive(Deserialize)]
struct ServiceAccountFields {
    client_email: String,
    private_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the config from a variable lookup; `from_env` passes `std::env`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let service_account_json =
            var("SERVICE_ACCOUNT_JSON").context("SERVICE_ACCOUNT_JSON must be set")?;
        let client_email = validate_service_account(&service_account_json)?;
        tracing::info!(client_email = %client_email, "Private key appears to be correctly formatted");

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            service_account_json,
            spreadsheet_id: var("SPREADSHEET_ID").context("SPREADSHEET_ID must be set")?,
            sheet_range: var("SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
            sheets_api_base: var("SHEETS_API_BASE")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
            sheets_timeout: Duration::from_secs(
                var("SHEETS_TIMEOUT_SECS")
                    .map(|secs| secs.parse::<u64>())
                    .transpose()
                    .context("SHEETS_TIMEOUT_SECS must be a valid number of seconds")?
                    .unwrap_or(DEFAULT_SHEETS_TIMEOUT_SECS),
            ),
            cors_allowed_origin: var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            profile_projection: var("LOGIN_PROFILE_FIELDS")
                .map(|fields| fields.parse::<ProfileProjection>())
                .transpose()
                .context("LOGIN_PROFILE_FIELDS must be 'full', 'none' or a list of profile fields")?
                .unwrap_or_default(),
        })
    }
}

/// Check that the key JSON parses and carries a PEM private key.
///
/// Returns the service account's client email.
pub fn validate_service_account(json: &str) -> Result<String, ConfigError> {
    let fields: ServiceAccountFields = serde_json::from_str(json)?;

    if !fields.private_key.contains("BEGIN PRIVATE KEY")
        || !fields.private_key.contains("END PRIVATE KEY")
    {
        return Err(ConfigError::PrivateKeyFormat);
    }

    Ok(fields.client_email)
}
