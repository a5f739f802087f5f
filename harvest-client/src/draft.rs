//! Edit drafts
//!
//! A [`ListingDraft`] holds the fields of both record shapes. Only the price
//! fields of the draft's own kind are read back when it is turned into a
//! record; the other set may hold stale values while the operator types.

use shared::{
    BuyerRequest, EntityKind, ModerationState, Record, RecordId, RecordStatus, SellerListing,
    UserRecord, UserRole,
};

use crate::error::EditError;
use crate::store::Keyed;

/// Price inputs exposed by the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    UnitPrice,
    BidFrom,
    BidTo,
}

impl PriceField {
    /// Fields the form shows for `kind`
    pub fn for_kind(kind: EntityKind) -> &'static [PriceField] {
        match kind {
            EntityKind::SellerListing => &[PriceField::UnitPrice],
            EntityKind::BuyerRequest => &[PriceField::BidFrom, PriceField::BidTo],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UnitPrice => "unit_price",
            Self::BidFrom => "bid_from",
            Self::BidTo => "bid_to",
        }
    }
}

/// One field change on a listing/request draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    ItemName(String),
    Location(String),
    Area(String),
    Quantity(f64),
    /// Harvest date or required date, depending on kind
    Date(String),
    /// Direct status edit; bypasses the moderation transitions
    Status(RecordStatus),
    Price(PriceField, Option<f64>),
}

/// Editable copy of a listing or request
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    kind: EntityKind,
    id: RecordId,
    pub item_name: String,
    pub location: String,
    pub area: String,
    pub quantity: f64,
    pub date: String,
    pub status: RecordStatus,
    pub unit_price: Option<f64>,
    pub bid_from: Option<f64>,
    pub bid_to: Option<f64>,
}

impl ListingDraft {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn price(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::UnitPrice => self.unit_price,
            PriceField::BidFrom => self.bid_from,
            PriceField::BidTo => self.bid_to,
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::ItemName(v) => self.item_name = v,
            DraftEdit::Location(v) => self.location = v,
            DraftEdit::Area(v) => self.area = v,
            DraftEdit::Quantity(v) => self.quantity = v,
            DraftEdit::Date(v) => self.date = v,
            DraftEdit::Status(v) => self.status = v,
            DraftEdit::Price(PriceField::UnitPrice, v) => self.unit_price = v,
            DraftEdit::Price(PriceField::BidFrom, v) => self.bid_from = v,
            DraftEdit::Price(PriceField::BidTo, v) => self.bid_to = v,
        }
    }

    /// Materialize the record this draft describes.
    ///
    /// Fails if a price field meaningful for the draft's kind is empty.
    pub fn to_record(&self) -> Result<Record, EditError> {
        let required = |field: PriceField| {
            self.price(field)
                .ok_or(EditError::MissingField(field.name()))
        };

        Ok(match self.kind {
            EntityKind::SellerListing => Record::Listing(SellerListing {
                id: self.id,
                item_name: self.item_name.clone(),
                location: self.location.clone(),
                area: self.area.clone(),
                quantity: self.quantity,
                unit_price: required(PriceField::UnitPrice)?,
                harvest_date: self.date.clone(),
                status: self.status.clone(),
            }),
            EntityKind::BuyerRequest => Record::Request(BuyerRequest {
                id: self.id,
                item_name: self.item_name.clone(),
                location: self.location.clone(),
                area: self.area.clone(),
                quantity: self.quantity,
                bid_from: required(PriceField::BidFrom)?,
                bid_to: required(PriceField::BidTo)?,
                required_date: self.date.clone(),
                status: self.status.clone(),
            }),
        })
    }
}

impl From<&Record> for ListingDraft {
    fn from(record: &Record) -> Self {
        let mut draft = Self {
            kind: record.kind(),
            id: record.id(),
            item_name: record.item_name().to_string(),
            location: record.location().to_string(),
            area: record.area().to_string(),
            quantity: record.quantity(),
            date: record.date().to_string(),
            status: record.status().clone(),
            unit_price: None,
            bid_from: None,
            bid_to: None,
        };
        match record {
            Record::Listing(l) => draft.unit_price = Some(l.unit_price),
            Record::Request(r) => {
                draft.bid_from = Some(r.bid_from);
                draft.bid_to = Some(r.bid_to);
            }
        }
        draft
    }
}

impl Keyed for ListingDraft {
    type Key = (EntityKind, RecordId);

    fn key(&self) -> Self::Key {
        (self.kind, self.id)
    }
}

/// One field change on a user draft
#[derive(Debug, Clone, PartialEq)]
pub enum UserEdit {
    Name(String),
    Email(String),
    Role(UserRole),
    Status(ModerationState),
}

impl UserEdit {
    pub fn apply(self, user: &mut UserRecord) {
        match self {
            Self::Name(v) => user.name = Some(v),
            Self::Email(v) => user.email = Some(v),
            Self::Role(v) => user.role = v,
            Self::Status(v) => user.status = v.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Record {
        Record::Request(BuyerRequest {
            id: 8,
            item_name: "Pumpkins".into(),
            location: "Anuradhapura".into(),
            area: "North Central".into(),
            quantity: 300.0,
            bid_from: 40.0,
            bid_to: 55.0,
            required_date: "2025-05-10".into(),
            status: RecordStatus::Pending,
        })
    }

    #[test]
    fn test_clone_exposes_only_kind_price_fields() {
        let draft = ListingDraft::from(&request());
        assert_eq!(draft.kind(), EntityKind::BuyerRequest);
        assert_eq!(draft.unit_price, None);
        assert_eq!(draft.bid_from, Some(40.0));
        assert_eq!(
            PriceField::for_kind(draft.kind()),
            &[PriceField::BidFrom, PriceField::BidTo]
        );
    }

    #[test]
    fn test_untouched_draft_round_trips() {
        let record = request();
        assert_eq!(ListingDraft::from(&record).to_record().unwrap(), record);
    }

    #[test]
    fn test_foreign_price_field_is_ignored() {
        let mut draft = ListingDraft::from(&request());
        draft.apply(DraftEdit::Price(PriceField::UnitPrice, Some(99.0)));
        draft.apply(DraftEdit::Price(PriceField::BidTo, Some(60.0)));

        let Record::Request(saved) = draft.to_record().unwrap() else {
            panic!("kind changed");
        };
        assert_eq!(saved.bid_to, 60.0);
        let json = serde_json::to_value(Record::Request(saved)).unwrap();
        assert!(json.get("unit_price").is_none());
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let mut draft = ListingDraft::from(&request());
        draft.apply(DraftEdit::Price(PriceField::BidFrom, None));
        assert_eq!(draft.to_record(), Err(EditError::MissingField("bid_from")));
    }

    #[test]
    fn test_status_edit_is_unguarded() {
        let mut draft = ListingDraft::from(&request());
        draft.apply(DraftEdit::Status(RecordStatus::Rejected));
        draft.apply(DraftEdit::Status(RecordStatus::Pending));
        assert_eq!(draft.to_record().unwrap().status(), &RecordStatus::Pending);
    }
}
