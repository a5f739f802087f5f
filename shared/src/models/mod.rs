//! Data models
//!
//! Record shapes exchanged with the moderation backend.
//! All record IDs are `i64`, unique within their own kind only.

pub mod listing;
pub mod record;
pub mod request;
pub mod user;

// Re-exports
pub use listing::*;
pub use record::*;
pub use request::*;
pub use user::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Listing / request identifier
pub type RecordId = i64;

/// Discriminator between the two moderated record shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    SellerListing,
    BuyerRequest,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [Self::SellerListing, Self::BuyerRequest];

    /// Tab title
    pub fn label(self) -> &'static str {
        match self {
            Self::SellerListing => "Seller Listings",
            Self::BuyerRequest => "Buyer Requests",
        }
    }

    /// Singular noun used in logs and error messages
    pub fn noun(self) -> &'static str {
        match self {
            Self::SellerListing => "listing",
            Self::BuyerRequest => "request",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
