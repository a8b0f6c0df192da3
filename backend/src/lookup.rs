//! Credential lookup over the rows of the user sheet.

use shared::models::{Credential, Row, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    NotFound,
    Found(UserRecord),
}

/// Return the first row whose username and phone both equal the credential.
///
/// Rows without a username or phone cell are skipped.
pub fn lookup(rows: &[Row], credential: &Credential) -> LookupResult {
    rows.iter()
        .enumerate()
        .find_map(|(index, row)| match UserRecord::try_from(row.as_slice()) {
            Ok(record) if credential.matches(&record) => Some(record),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(row = index + 1, "Skipping malformed row: {}", e);
                None
            }
        })
        .map_or(LookupResult::NotFound, LookupResult::Found)
}
