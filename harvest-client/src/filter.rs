//! Filter engine
//!
//! The visible subset is tab × status filter × search term, applied cheapest
//! first. The three predicates are independent, so the order only matters
//! for cost, never for the result.
//!
//! Status filter and search term are not kind-aware: switching tabs keeps
//! both, so a term typed on the listings tab still applies on the requests
//! tab.

use std::fmt;
use std::str::FromStr;

use shared::{EntityKind, ModerationState, Record, RecordStatus, UserRecord};
use thiserror::Error;

use crate::store::EntityStore;

/// Status filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ModerationState),
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(state) => state.label(),
        }
    }

    /// `All` passes everything; otherwise compare canonical states, so
    /// `Only(Verified)` matches both `verified` and `active`.
    pub fn matches(self, status: &RecordStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(state) => status.canonical() == Some(state),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status filter: {0}")]
pub struct ParseStatusFilterError(String);

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        ModerationState::from_label(s)
            .map(Self::Only)
            .ok_or_else(|| ParseStatusFilterError(s.to_string()))
    }
}

/// Case-insensitive substring match on item name, location and area.
/// The term is used as typed, surrounding spaces included. An empty term
/// matches everything.
pub fn matches_search(record: &Record, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [record.item_name(), record.location(), record.area()]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Case-insensitive substring match on user name or email.
/// Missing fields never match; an empty term matches everything.
pub fn matches_user_search(user: &UserRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [user.name.as_deref(), user.email.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Users matching `term`, in store order
pub fn search_users<'a>(users: &'a [UserRecord], term: &str) -> Vec<&'a UserRecord> {
    users
        .iter()
        .filter(|user| matches_user_search(user, term))
        .collect()
}

/// Current tab, status filter and search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    tab: EntityKind,
    status: StatusFilter,
    search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            tab: EntityKind::SellerListing,
            status: StatusFilter::All,
            search: String::new(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> EntityKind {
        self.tab
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Switch the base collection. Status filter and search term are kept.
    pub fn select_tab(&mut self, tab: EntityKind) {
        self.tab = tab;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Filter choices for the current tab.
    ///
    /// Derived from the tab's status vocabulary; since `active` and
    /// `verified` collapse into one bucket, both tabs offer the same labels.
    pub fn status_options(&self) -> Vec<StatusFilter> {
        let mut options = vec![StatusFilter::All];
        for state in ModerationState::ALL {
            let bucket = RecordStatus::for_state(self.tab, state).canonical();
            if let Some(bucket) = bucket {
                let option = StatusFilter::Only(bucket);
                if !options.contains(&option) {
                    options.push(option);
                }
            }
        }
        options
    }

    /// Visible records of the current tab
    pub fn apply<'a>(&self, store: &'a EntityStore) -> Vec<&'a Record> {
        let needle = self.search.to_lowercase();
        store
            .records(self.tab)
            .iter()
            .filter(|record| self.status.matches(record.status()))
            .filter(|record| matches_search(record, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared::{BuyerRequest, SellerListing, UserRole};

    fn listing(id: i64, name: &str, location: &str, status: &str) -> Record {
        Record::Listing(SellerListing {
            id,
            item_name: name.into(),
            location: location.into(),
            area: "Central".into(),
            quantity: 20.0,
            unit_price: 150.0,
            harvest_date: "2025-03-24".into(),
            status: RecordStatus::parse(status),
        })
    }

    fn request(id: i64, name: &str, status: &str) -> Record {
        Record::Request(BuyerRequest {
            id,
            item_name: name.into(),
            location: "Colombo".into(),
            area: "Pettah".into(),
            quantity: 5.0,
            bid_from: 100.0,
            bid_to: 140.0,
            required_date: "2025-04-01".into(),
            status: RecordStatus::parse(status),
        })
    }

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store
            .replace_all(
                EntityKind::SellerListing,
                vec![
                    listing(1, "Organic Tomatoes", "Nuwara Eliya", "pending"),
                    listing(2, "Fresh Cucumbers", "Dambulla", "verified"),
                    listing(3, "Red Onions", "Jaffna", "pending"),
                    listing(4, "Eggplants", "Matale", "pending"),
                    listing(5, "Green Peppers", "Kandy", "rejected"),
                ],
            )
            .unwrap();
        store
            .replace_all(
                EntityKind::BuyerRequest,
                vec![
                    request(1, "Cucumbers", "active"),
                    request(2, "Potatoes", "pending"),
                    request(3, "Leeks", "on hold"),
                ],
            )
            .unwrap();
        store
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_pending_filter_returns_three_listings() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_status("Pending".parse().unwrap());
        assert_eq!(ids(&filter.apply(&store)), vec![1, 3, 4]);
    }

    #[test]
    fn test_search_finds_cucumbers_under_all() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_search("cucum");
        let visible = filter.apply(&store);
        assert_eq!(ids(&visible), vec![2]);
        assert_eq!(visible[0].item_name(), "Fresh Cucumbers");
    }

    #[test]
    fn test_search_covers_location_and_area_case_insensitively() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_search("JAFF");
        assert_eq!(ids(&filter.apply(&store)), vec![3]);
        filter.set_search("central");
        assert_eq!(filter.apply(&store).len(), 5);
    }

    #[test]
    fn test_empty_search_returns_status_scoped_set() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_status(StatusFilter::Only(ModerationState::Rejected));
        filter.set_search("");
        assert_eq!(ids(&filter.apply(&store)), vec![5]);
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_search(" cucum");
        assert_eq!(ids(&filter.apply(&store)), vec![2]);
        filter.set_search("cucum ");
        assert!(filter.apply(&store).is_empty());
        filter.set_search("   ");
        assert!(filter.apply(&store).is_empty());
    }

    #[test]
    fn test_verified_filter_matches_active_requests() {
        let store = store();
        let mut filter = FilterState::new();
        filter.select_tab(EntityKind::BuyerRequest);
        filter.set_status(StatusFilter::Only(ModerationState::Verified));
        assert_eq!(ids(&filter.apply(&store)), vec![1]);
    }

    #[test]
    fn test_unknown_status_only_passes_all() {
        let store = store();
        let mut filter = FilterState::new();
        filter.select_tab(EntityKind::BuyerRequest);
        assert_eq!(filter.apply(&store).len(), 3);
        for state in ModerationState::ALL {
            filter.set_status(StatusFilter::Only(state));
            assert!(!ids(&filter.apply(&store)).contains(&3));
        }
    }

    #[test]
    fn test_predicate_order_does_not_change_result() {
        let store = store();
        for tab in EntityKind::ALL {
            for status in [
                StatusFilter::All,
                StatusFilter::Only(ModerationState::Pending),
                StatusFilter::Only(ModerationState::Verified),
                StatusFilter::Only(ModerationState::Rejected),
            ] {
                for term in ["", "cucum", "o", "colombo", "zzz"] {
                    let mut filter = FilterState::new();
                    filter.select_tab(tab);
                    filter.set_status(status);
                    filter.set_search(term);

                    let combined = ids(&filter.apply(&store));

                    let status_first: Vec<&Record> = store
                        .records(tab)
                        .iter()
                        .filter(|r| status.matches(r.status()))
                        .collect();
                    let then_search: Vec<&Record> = status_first
                        .into_iter()
                        .filter(|r| matches_search(r, term))
                        .collect();

                    let search_first: Vec<&Record> = store
                        .records(tab)
                        .iter()
                        .filter(|r| matches_search(r, term))
                        .filter(|r| status.matches(r.status()))
                        .collect();

                    assert_eq!(combined, ids(&then_search));
                    assert_eq!(combined, ids(&search_first));
                }
            }
        }
    }

    #[test]
    fn test_tab_switch_keeps_status_and_search() {
        let store = store();
        let mut filter = FilterState::new();
        filter.set_status(StatusFilter::Only(ModerationState::Pending));
        filter.set_search("potato");
        assert!(filter.apply(&store).is_empty());

        filter.select_tab(EntityKind::BuyerRequest);
        assert_eq!(filter.search(), "potato");
        assert_eq!(filter.status(), StatusFilter::Only(ModerationState::Pending));
        assert_eq!(ids(&filter.apply(&store)), vec![2]);
    }

    #[test]
    fn test_status_options_are_unified_across_tabs() {
        let mut filter = FilterState::new();
        let listing_options = filter.status_options();
        filter.select_tab(EntityKind::BuyerRequest);
        assert_eq!(filter.status_options(), listing_options);
        let labels: Vec<&str> = listing_options.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["All", "Pending", "Verified", "Rejected"]);
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "Verified".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ModerationState::Verified))
        );
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_user_search_by_name_or_email() {
        let users: Vec<UserRecord> = vec![
            UserRecord {
                id: 1,
                name: Some("Kamala Perera".into()),
                email: Some("kamala@farm.lk".into()),
                role: UserRole::Farmer,
                status: ModerationState::Pending.into(),
                created_at: None,
                docs: None,
            },
            UserRecord {
                id: 2,
                name: None,
                email: Some("buyer@market.lk".into()),
                role: UserRole::Buyer,
                status: ModerationState::Verified.into(),
                created_at: None,
                docs: None,
            },
        ];
        let found: Vec<i64> = search_users(&users, "PERERA").iter().map(|u| u.id).collect();
        assert_eq!(found, vec![1]);
        let found: Vec<i64> = search_users(&users, "market").iter().map(|u| u.id).collect();
        assert_eq!(found, vec![2]);
        assert_eq!(search_users(&users, "").len(), 2);
    }
}
