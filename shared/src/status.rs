//! Status lifecycle
//!
//! Raw status values as the backend stores them, the canonical moderation
//! state they collapse into, and the transitions an operator may trigger.
//!
//! Seller listings and buyer requests use different words for the same
//! outcome: a verified listing is stored as `verified`, a verified request as
//! `active`. Everything that displays or filters statuses goes through
//! [`RecordStatus::canonical`] so the two are never told apart.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::EntityKind;

/// Kind-agnostic moderation bucket
///
/// Also the verification vocabulary of user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationState {
    Pending,
    Verified,
    Rejected,
}

impl ModerationState {
    /// All states in display order
    pub const ALL: [ModerationState; 3] = [Self::Pending, Self::Verified, Self::Rejected];

    /// Lowercase wire value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse a display label or wire value, ignoring case.
    ///
    /// `active` is accepted as a synonym for `verified`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("active") {
            return Some(Self::Verified);
        }
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(label))
    }

    /// Terminal states expose no further moderation action
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn tone(self) -> StatusTone {
        match self {
            Self::Verified => StatusTone::Positive,
            Self::Pending => StatusTone::Warning,
            Self::Rejected => StatusTone::Negative,
        }
    }
}

impl fmt::Display for ModerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge tone used when rendering a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Warning,
    Negative,
}

/// Operator actions on a pending record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Verify,
    Reject,
}

impl ModerationAction {
    /// State the action moves a record into
    pub fn target(self) -> ModerationState {
        match self {
            Self::Verify => ModerationState::Verified,
            Self::Reject => ModerationState::Rejected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Verify => "Verify",
            Self::Reject => "Reject",
        }
    }
}

const PENDING_ACTIONS: &[ModerationAction] = &[ModerationAction::Verify, ModerationAction::Reject];

/// Raw status of a listing, request or user account, as stored upstream
///
/// Known values are normalized to lowercase on parse. Anything else is kept
/// verbatim in [`RecordStatus::Other`] so a save round-trips it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Pending,
    /// Listing-side verified
    Verified,
    /// Request-side verified
    Active,
    Rejected,
    Other(String),
}

impl RecordStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "verified" => Self::Verified,
            "active" => Self::Active,
            "rejected" => Self::Rejected,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Raw value written for `state` on a record of `kind`
    pub fn for_state(kind: EntityKind, state: ModerationState) -> Self {
        match (kind, state) {
            (_, ModerationState::Pending) => Self::Pending,
            (EntityKind::SellerListing, ModerationState::Verified) => Self::Verified,
            (EntityKind::BuyerRequest, ModerationState::Verified) => Self::Active,
            (_, ModerationState::Rejected) => Self::Rejected,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Other(raw) => raw,
        }
    }

    /// Canonical moderation bucket, `None` for unrecognised values
    pub fn canonical(&self) -> Option<ModerationState> {
        match self {
            Self::Pending => Some(ModerationState::Pending),
            Self::Verified | Self::Active => Some(ModerationState::Verified),
            Self::Rejected => Some(ModerationState::Rejected),
            Self::Other(_) => None,
        }
    }

    /// Display label; `verified` and `active` both render as "Verified"
    pub fn label(&self) -> Cow<'_, str> {
        match self.canonical() {
            Some(state) => Cow::Borrowed(state.label()),
            None => Cow::Owned(title_case(self.as_str())),
        }
    }

    pub fn tone(&self) -> StatusTone {
        self.canonical()
            .map(ModerationState::tone)
            .unwrap_or(StatusTone::Negative)
    }

    /// Actions offered to the operator; only pending records have any
    pub fn available_actions(&self) -> &'static [ModerationAction] {
        match self.canonical() {
            Some(ModerationState::Pending) => PENDING_ACTIONS,
            _ => &[],
        }
    }

    /// Whether a guarded moderation transition to `target` is legal.
    ///
    /// Direct edits through a draft bypass this check.
    pub fn can_transition(&self, target: ModerationState) -> bool {
        self.canonical() == Some(ModerationState::Pending) && target.is_terminal()
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<String> for RecordStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for RecordStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ModerationState> for RecordStatus {
    /// Kind-neutral raw value, as written on user accounts
    fn from(state: ModerationState) -> Self {
        match state {
            ModerationState::Pending => Self::Pending,
            ModerationState::Verified => Self::Verified,
            ModerationState::Rejected => Self::Rejected,
        }
    }
}

/// Compares the canonical bucket, so `active` equals `Verified`
impl PartialEq<ModerationState> for RecordStatus {
    fn eq(&self, other: &ModerationState) -> bool {
        self.canonical() == Some(*other)
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case the first character only. Display use only.
pub fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
