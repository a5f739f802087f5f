//! User Model

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::status::{ModerationState, RecordStatus};

/// User account identifier
pub type UserId = i64;

/// Marketplace role
///
/// Unknown roles are kept verbatim so one odd row never fails the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Farmer,
    Buyer,
    Other(String),
}

impl UserRole {
    pub fn label(&self) -> &str {
        match self {
            Self::Farmer => "Farmer",
            Self::Buyer => "Buyer",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "farmer" => Self::Farmer,
            "buyer" => Self::Buyer,
            _ => Self::Other(raw),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

/// User account as returned by `GET /admin/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "user_id")]
    pub id: UserId,
    #[serde(rename = "user_name", default)]
    pub name: Option<String>,
    #[serde(rename = "user_mail", default)]
    pub email: Option<String>,
    #[serde(rename = "user_role")]
    pub role: UserRole,
    /// Verification status; unknown values fall outside every bucket
    #[serde(rename = "user_status")]
    pub status: RecordStatus,
    /// Creation timestamp (RFC 3339)
    #[serde(rename = "user_createdAt", default)]
    pub created_at: Option<String>,
    /// Relative path of the uploaded ID / business registration document
    #[serde(rename = "user_docs", default)]
    pub docs: Option<String>,
}

impl UserRecord {
    /// Calendar date the account was created
    pub fn joined_on(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        let date_part = raw.split('T').next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Status the verify/unverify toggle moves this user into
    pub fn toggled_status(&self) -> ModerationState {
        match self.status.canonical() {
            Some(ModerationState::Verified) => ModerationState::Pending,
            _ => ModerationState::Verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> UserRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_wire_names() {
        let user = parse(
            r#"{"user_id":7,"user_name":"Nimal","user_mail":"nimal@example.com",
                "user_role":"Farmer","user_status":"pending",
                "user_createdAt":"2025-03-20T08:15:00.000Z","user_docs":"uploads/7.png"}"#,
        );
        assert_eq!(user.id, 7);
        assert_eq!(user.role, UserRole::Farmer);
        assert_eq!(user.status, ModerationState::Pending);
        assert_eq!(user.docs.as_deref(), Some("uploads/7.png"));
        assert_eq!(
            user.joined_on(),
            NaiveDate::from_ymd_opt(2025, 3, 20)
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        let user = parse(r#"{"user_id":1,"user_role":"buyer","user_status":"verified"}"#);
        assert_eq!(user.name, None);
        assert_eq!(user.role, UserRole::Buyer);
        assert_eq!(user.joined_on(), None);
    }

    #[test]
    fn test_joined_on_accepts_plain_dates() {
        let mut user = parse(r#"{"user_id":1,"user_role":"Buyer","user_status":"verified"}"#);
        user.created_at = Some("2025-01-05T10:00:00".into());
        assert_eq!(user.joined_on(), NaiveDate::from_ymd_opt(2025, 1, 5));
        user.created_at = Some("yesterday".into());
        assert_eq!(user.joined_on(), None);
    }

    #[test]
    fn test_toggle() {
        let mut user = parse(r#"{"user_id":1,"user_role":"Buyer","user_status":"verified"}"#);
        assert_eq!(user.toggled_status(), ModerationState::Pending);
        user.status = ModerationState::Rejected.into();
        assert_eq!(user.toggled_status(), ModerationState::Verified);
    }

    #[test]
    fn test_unknown_role_and_status_are_kept() {
        let user = parse(r#"{"user_id":9,"user_role":"Transporter","user_status":"suspended"}"#);
        assert_eq!(user.role, UserRole::Other("Transporter".into()));
        assert_eq!(user.status, RecordStatus::Other("suspended".into()));
        assert_eq!(user.toggled_status(), ModerationState::Verified);

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["user_role"], "Transporter");
        assert_eq!(value["user_status"], "suspended");
    }

    #[test]
    fn test_serialize_round_trips_wire_names() {
        let user = parse(r#"{"user_id":4,"user_role":"Farmer","user_status":"rejected"}"#);
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["user_id"], 4);
        assert_eq!(value["user_status"], "rejected");
        assert_eq!(value["user_role"], "Farmer");
    }
}
