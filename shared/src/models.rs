use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::UserProfile;

/// One record of the user sheet, as an ordered list of cell values.
pub type Row = Vec<String>;

/// Fixed column positions of the user sheet (`Sheet1!A:I`).
pub mod columns {
    /// Column A
    pub const USERNAME: usize = 0;
    /// Column B
    pub const EMAIL: usize = 1;
    /// Column C
    pub const PHONE: usize = 2;
    /// Column D
    pub const JOIN_DATE: usize = 3;
    /// Column H
    pub const MANAGER: usize = 7;
    /// Column I
    pub const EARNINGS: usize = 8;
}

// ============================================================================
// Sheet Records
// ============================================================================

/// A user row with named fields.
///
/// `username` and `phone` are always present. A profile column is `None`
/// only when the row ends before it; an empty cell stays an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: Option<String>,
    pub phone: String,
    pub join_date: Option<String>,
    pub manager: Option<String>,
    pub earnings: Option<String>,
}

/// A row that cannot be turned into a [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRow {
    #[error("row has {0} cells, expected at least {min}", min = columns::PHONE + 1)]
    TooShort(usize),

    #[error("row has an empty {0} cell")]
    EmptyCell(&'static str),
}

impl TryFrom<&[String]> for UserRecord {
    type Error = MalformedRow;

    fn try_from(row: &[String]) -> Result<Self, Self::Error> {
        if row.len() <= columns::PHONE {
            return Err(MalformedRow::TooShort(row.len()));
        }

        let username = row[columns::USERNAME].clone();
        if username.is_empty() {
            return Err(MalformedRow::EmptyCell("username"));
        }
        let phone = row[columns::PHONE].clone();
        if phone.is_empty() {
            return Err(MalformedRow::EmptyCell("phone"));
        }

        let optional = |index: usize| row.get(index).cloned();

        Ok(Self {
            username,
            email: optional(columns::EMAIL),
            phone,
            join_date: optional(columns::JOIN_DATE),
            manager: optional(columns::MANAGER),
            earnings: optional(columns::EARNINGS),
        })
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// The (username, phone) pair submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    identifier: String,
    secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCredential {
    #[error("{0} is required")]
    Missing(&'static str),

    /// Present but not a string, so it can never equal a sheet cell
    #[error("{0} is not a string")]
    NotText(&'static str),
}

impl Credential {
    /// Build a credential, rejecting empty fields.
    pub fn new(
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, InvalidCredential> {
        let identifier = identifier.into();
        let secret = secret.into();

        if identifier.is_empty() {
            return Err(InvalidCredential::Missing("username"));
        }
        if secret.is_empty() {
            return Err(InvalidCredential::Missing("phone"));
        }

        Ok(Self { identifier, secret })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Exact, case-sensitive match on both username and phone.
    pub fn matches(&self, record: &UserRecord) -> bool {
        record.username == self.identifier && record.phone == self.secret
    }
}

// ============================================================================
// Profile Projection
// ============================================================================

/// A profile field that can be exposed in a successful login response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Username,
    Email,
    Phone,
    JoinDate,
    Manager,
    Earnings,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Username,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::JoinDate,
        ProfileField::Manager,
        ProfileField::Earnings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Username => "username",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::JoinDate => "joinDate",
            ProfileField::Manager => "manager",
            ProfileField::Earnings => "earnings",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile field '{0}'")]
pub struct UnknownProfileField(pub String);

impl FromStr for ProfileField {
    type Err = UnknownProfileField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProfileField(s.to_string()))
    }
}

/// Which fields of a matched record are returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileProjection {
    fields: Vec<ProfileField>,
}

impl ProfileProjection {
    /// Every profile field.
    pub fn full() -> Self {
        Self {
            fields: ProfileField::ALL.to_vec(),
        }
    }

    /// Success flag only, no profile data.
    pub fn none() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_fields(fields: impl IntoIterator<Item = ProfileField>) -> Self {
        let mut projection = Self::none();
        for field in fields {
            if !projection.fields.contains(&field) {
                projection.fields.push(field);
            }
        }
        projection
    }

    pub fn fields(&self) -> &[ProfileField] {
        &self.fields
    }

    pub fn includes(&self, field: ProfileField) -> bool {
        self.fields.contains(&field)
    }

    /// Project a record; `None` when no fields are configured.
    pub fn project(&self, record: &UserRecord) -> Option<UserProfile> {
        if self.fields.is_empty() {
            return None;
        }

        let pick = |field: ProfileField, value: Option<&String>| {
            value.filter(|_| self.includes(field)).cloned()
        };

        Some(UserProfile {
            username: pick(ProfileField::Username, Some(&record.username)),
            email: pick(ProfileField::Email, record.email.as_ref()),
            phone: pick(ProfileField::Phone, Some(&record.phone)),
            join_date: pick(ProfileField::JoinDate, record.join_date.as_ref()),
            manager: pick(ProfileField::Manager, record.manager.as_ref()),
            earnings: pick(ProfileField::Earnings, record.earnings.as_ref()),
        })
    }
}

impl Default for ProfileProjection {
    fn default() -> Self {
        Self::full()
    }
}

/// Parses `full`, `none`, or a comma-separated list such as `username,joinDate`.
impl FromStr for ProfileProjection {
    type Err = UnknownProfileField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "all" => Ok(Self::full()),
            "none" | "" => Ok(Self::none()),
            _ => {
                let fields = s
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::parse)
                    .collect::<Result<Vec<ProfileField>, _>>()?;
                Ok(Self::with_fields(fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn full_row() -> Row {
        row(&[
            "alice",
            "a@x.com",
            "555",
            "2024-01-02",
            "",
            "",
            "",
            "bob",
            "1200",
        ])
    }

    #[test]
    fn test_full_row_parses_named_fields() {
        let record = UserRecord::try_from(full_row().as_slice()).expect("should parse");
        assert_eq!(record.username, "alice");
        assert_eq!(record.email.as_deref(), Some("a@x.com"));
        assert_eq!(record.phone, "555");
        assert_eq!(record.join_date.as_deref(), Some("2024-01-02"));
        assert_eq!(record.manager.as_deref(), Some("bob"));
        assert_eq!(record.earnings.as_deref(), Some("1200"));
    }

    #[test]
    fn test_short_row_leaves_profile_absent() {
        let record = UserRecord::try_from(row(&["alice", "", "555"]).as_slice())
            .expect("three cells are enough");
        assert_eq!(record.email.as_deref(), Some(""));
        assert_eq!(record.join_date, None);
        assert_eq!(record.earnings, None);
    }

    #[test]
    fn test_malformed_rows_rejected() {
        assert_eq!(
            UserRecord::try_from(row(&["alice", "a@x.com"]).as_slice()),
            Err(MalformedRow::TooShort(2))
        );
        assert_eq!(
            UserRecord::try_from(row(&["", "a@x.com", "555"]).as_slice()),
            Err(MalformedRow::EmptyCell("username"))
        );
        assert_eq!(
            UserRecord::try_from(row(&["alice", "a@x.com", ""]).as_slice()),
            Err(MalformedRow::EmptyCell("phone"))
        );
    }

    #[test]
    fn test_credential_requires_both_fields() {
        assert_eq!(
            Credential::new("", "555"),
            Err(InvalidCredential::Missing("username"))
        );
        assert_eq!(
            Credential::new("alice", ""),
            Err(InvalidCredential::Missing("phone"))
        );
        assert!(Credential::new("alice", "555").is_ok());
    }

    #[test]
    fn test_credential_match_is_exact() {
        let record = UserRecord::try_from(full_row().as_slice()).unwrap();

        assert!(Credential::new("alice", "555").unwrap().matches(&record));
        assert!(!Credential::new("Alice", "555").unwrap().matches(&record));
        assert!(!Credential::new("alice", "555 ").unwrap().matches(&record));
        assert!(!Credential::new("alice", "000").unwrap().matches(&record));
    }

    #[test]
    fn test_projection_parsing() {
        assert_eq!("full".parse::<ProfileProjection>().unwrap(), ProfileProjection::full());
        assert_eq!("NONE".parse::<ProfileProjection>().unwrap(), ProfileProjection::none());

        let projection: ProfileProjection = "username, joinDate,username".parse().unwrap();
        assert_eq!(
            projection.fields(),
            &[ProfileField::Username, ProfileField::JoinDate]
        );

        let err = "username,salary".parse::<ProfileProjection>().unwrap_err();
        assert_eq!(err, UnknownProfileField("salary".to_string()));
    }

    #[test]
    fn test_projection_selects_configured_fields() {
        let record = UserRecord::try_from(full_row().as_slice()).unwrap();

        let profile = ProfileProjection::with_fields([ProfileField::Username, ProfileField::Earnings])
            .project(&record)
            .expect("fields configured");
        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert_eq!(profile.earnings.as_deref(), Some("1200"));
        assert_eq!(profile.email, None);
        assert_eq!(profile.phone, None);

        assert!(ProfileProjection::none().project(&record).is_none());
    }
}
