//! Buyer Request Model

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::status::RecordStatus;

/// Produce wanted by a buyer, with the price range they bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerRequest {
    pub id: RecordId,
    pub item_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub quantity: f64,
    /// Lower end of the bid range
    pub bid_from: f64,
    /// Upper end of the bid range
    pub bid_to: f64,
    /// Date the produce is needed by (ISO 8601 date)
    #[serde(default)]
    pub required_date: String,
    /// `active` once verified
    #[serde(default)]
    pub status: RecordStatus,
}
