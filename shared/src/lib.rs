//! Shared types for the Harvest admin console
//!
//! Wire models exchanged with the moderation backend and the status
//! lifecycle that interprets them. No I/O lives here.

pub mod models;
pub mod request;
pub mod response;
pub mod status;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    BuyerRequest, EntityKind, Price, Record, RecordId, SellerListing, UserId, UserRecord,
    UserRole,
};
pub use response::{Ack, ApiErrorBody};
pub use status::{ModerationAction, ModerationState, RecordStatus, StatusTone};
