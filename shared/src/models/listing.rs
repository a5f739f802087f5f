//! Seller Listing Model

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::status::RecordStatus;

/// Produce offered by a farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerListing {
    pub id: RecordId,
    pub item_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Harvest date (ISO 8601 date)
    #[serde(default)]
    pub harvest_date: String,
    #[serde(default)]
    pub status: RecordStatus,
}
