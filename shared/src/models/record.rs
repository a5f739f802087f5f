//! Unified record view
//!
//! Listings and requests share most of their fields but price differently.
//! [`Record`] lets the store and the filter treat both the same way while
//! keeping the price fields a disjoint union.

use serde::Serialize;

use super::{BuyerRequest, EntityKind, RecordId, SellerListing};
use crate::status::RecordStatus;

/// Kind-specific price
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Unit(f64),
    Bid { from: f64, to: f64 },
}

/// A listing or a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Listing(SellerListing),
    Request(BuyerRequest),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Listing(_) => EntityKind::SellerListing,
            Self::Request(_) => EntityKind::BuyerRequest,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Listing(l) => l.id,
            Self::Request(r) => r.id,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            Self::Listing(l) => &l.item_name,
            Self::Request(r) => &r.item_name,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Listing(l) => &l.location,
            Self::Request(r) => &r.location,
        }
    }

    pub fn area(&self) -> &str {
        match self {
            Self::Listing(l) => &l.area,
            Self::Request(r) => &r.area,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            Self::Listing(l) => l.quantity,
            Self::Request(r) => r.quantity,
        }
    }

    pub fn status(&self) -> &RecordStatus {
        match self {
            Self::Listing(l) => &l.status,
            Self::Request(r) => &r.status,
        }
    }

    /// Harvest date for listings, required date for requests
    pub fn date(&self) -> &str {
        match self {
            Self::Listing(l) => &l.harvest_date,
            Self::Request(r) => &r.required_date,
        }
    }

    pub fn price(&self) -> Price {
        match self {
            Self::Listing(l) => Price::Unit(l.unit_price),
            Self::Request(r) => Price::Bid {
                from: r.bid_from,
                to: r.bid_to,
            },
        }
    }

    /// Copy of this record carrying a different status
    pub fn with_status(&self, status: RecordStatus) -> Self {
        let mut next = self.clone();
        match &mut next {
            Self::Listing(l) => l.status = status,
            Self::Request(r) => r.status = status,
        }
        next
    }
}

impl From<SellerListing> for Record {
    fn from(listing: SellerListing) -> Self {
        Self::Listing(listing)
    }
}

impl From<BuyerRequest> for Record {
    fn from(request: BuyerRequest) -> Self {
        Self::Request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BuyerRequest {
        BuyerRequest {
            id: 3,
            item_name: "Carrots".into(),
            location: "Kandy".into(),
            area: "Peradeniya".into(),
            quantity: 120.0,
            bid_from: 80.0,
            bid_to: 95.0,
            required_date: "2025-04-02".into(),
            status: RecordStatus::Pending,
        }
    }

    #[test]
    fn test_request_accessors() {
        let record = Record::from(request());
        assert_eq!(record.kind(), EntityKind::BuyerRequest);
        assert_eq!(record.id(), 3);
        assert_eq!(record.date(), "2025-04-02");
        assert_eq!(record.price(), Price::Bid { from: 80.0, to: 95.0 });
    }

    #[test]
    fn test_with_status_leaves_original_untouched() {
        let record = Record::from(request());
        let verified = record.with_status(RecordStatus::Active);
        assert_eq!(record.status(), &RecordStatus::Pending);
        assert_eq!(verified.status(), &RecordStatus::Active);
        assert_eq!(verified.id(), record.id());
    }

    #[test]
    fn test_serializes_without_variant_tag() {
        let value = serde_json::to_value(Record::from(request())).unwrap();
        assert_eq!(value["bid_from"], 80.0);
        assert_eq!(value["status"], "pending");
        assert!(value.get("unit_price").is_none());
        assert!(value.get("Request").is_none());
    }
}
