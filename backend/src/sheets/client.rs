//! Google Sheets v4 client authenticated with a service account.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use shared::models::Row;
use yup_oauth2::authenticator::DefaultAuthenticator;

use super::{RowSource, SheetsError};
use crate::config::AppConfig;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Client for reading a fixed range of one spreadsheet
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    auth: DefaultAuthenticator,
    values_url: String,
}

/// `spreadsheets.values.get` response body. `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleSheetsClient {
    /// Create a client from the service account key and sheet settings in `config`
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let key = yup_oauth2::parse_service_account_key(&config.service_account_json)
            .context("Failed to parse service account key")?;

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .context("Failed to build service account authenticator")?;

        let http = reqwest::Client::builder()
            .timeout(config.sheets_timeout)
            .build()
            .context("Failed to build Sheets HTTP client")?;

        Ok(Self {
            http,
            auth,
            values_url: values_url(
                &config.sheets_api_base,
                &config.spreadsheet_id,
                &config.sheet_range,
            ),
        })
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        let token = self.auth.token(&[SHEETS_SCOPE]).await?;
        token
            .token()
            .map(str::to_string)
            .ok_or(SheetsError::MissingToken)
    }
}

#[async_trait]
impl RowSource for GoogleSheetsClient {
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetsError> {
        let token = self.access_token().await?;
        let range = fetch_value_range(&self.http, &self.values_url, &token).await?;
        Ok(into_rows(range))
    }
}

/// One `values.get` call. Stalls are bounded by the client's timeout.
async fn fetch_value_range(
    http: &reqwest::Client,
    url: &str,
    token: &str,
) -> Result<ValueRange, SheetsError> {
    let response = http.get(url).bearer_auth(token).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SheetsError::Status { status, body });
    }

    Ok(response.json().await?)
}

/// URL of the `values.get` call for one spreadsheet range
fn values_url(api_base: &str, spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/v4/spreadsheets/{}/values/{}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range)
    )
}

fn into_rows(range: ValueRange) -> Vec<Row> {
    range
        .values
        .into_iter()
        .map(|cells| cells.into_iter().map(cell_text).collect())
        .collect()
}

/// Formatted values arrive as strings, but keep numbers and booleans usable too.
fn cell_text(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_stalled_sheets_call_times_out() {
        // Accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let url = values_url(&format!("http://{}", addr), "sheet-1", "Sheet1!A:I");

        let result = fetch_value_range(&http, &url, "token").await;
        match result {
            Err(SheetsError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other.map(|_| ())),
        }

        server.abort();
    }

    #[test]
    fn test_values_url_encodes_range() {
        assert_eq!(
            values_url("https://sheets.googleapis.com/", "abc123", "Sheet1!A:I"),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1%21A%3AI"
        );
    }

    #[test]
    fn test_value_range_to_rows() {
        let range: ValueRange = serde_json::from_value(json!({
            "range": "Sheet1!A1:I2",
            "majorDimension": "ROWS",
            "values": [
                ["alice", "a@x.com", "555"],
                ["bob", null, 5551234, true]
            ]
        }))
        .unwrap();

        assert_eq!(
            into_rows(range),
            vec![
                vec!["alice".to_string(), "a@x.com".to_string(), "555".to_string()],
                vec![
                    "bob".to_string(),
                    String::new(),
                    "5551234".to_string(),
                    "true".to_string()
                ],
            ]
        );
    }

    #[test]
    fn test_empty_range_has_no_rows() {
        let range: ValueRange =
            serde_json::from_value(json!({ "range": "Sheet1!A1:I1000", "majorDimension": "ROWS" }))
                .unwrap();
        assert!(into_rows(range).is_empty());
    }
}
