//! Access to the spreadsheet holding user rows.
//!
//! Handlers depend on the [`RowSource`] trait; [`GoogleSheetsClient`] is the
//! production implementation backed by the Sheets v4 REST API.

mod client;

use async_trait::async_trait;
use shared::models::Row;
use thiserror::Error;

pub use client::GoogleSheetsClient;

/// Errors raised while fetching rows from the spreadsheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Service account token exchange failed
    #[error("Failed to obtain access token: {0}")]
    Auth(#[from] yup_oauth2::Error),

    /// Token response carried no access token
    #[error("Access token response contained no token")]
    MissingToken,

    /// Network or decode failure talking to the Sheets API
    #[error("Sheets request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Sheets API answered with a non-success status
    #[error("Sheets API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Source of the user table. Rows are fetched fresh on every call.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch every row of the configured range. An empty sheet yields an empty vec.
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetsError>;
}
