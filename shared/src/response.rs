//! API Response types
//!
//! Bodies returned by the moderation backend's mutation endpoints.

use serde::{Deserialize, Serialize};

/// Acknowledgement of a mutation
///
/// The backend answers with a small JSON object, usually carrying a
/// human-readable message, sometimes with nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Error body of a failed request
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_tolerates_missing_and_extra_fields() {
        let ack: Ack = serde_json::from_str("{}").unwrap();
        assert_eq!(ack, Ack::default());

        let ack: Ack = serde_json::from_str(r#"{"message":"User deleted","affected":1}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("User deleted"));
    }
}
