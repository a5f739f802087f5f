//! Entity store
//!
//! In-memory copies of what the backend last confirmed. Every write here
//! happens after the corresponding remote call resolved, and touches either
//! the whole collection (`replace_all`) or exactly one entry.

use std::fmt;

use shared::{EntityKind, Record, RecordId, UserId, UserRecord};

use crate::error::StoreError;

/// Anything stored by id
pub trait Keyed {
    type Key: Copy + Eq + fmt::Debug;

    fn key(&self) -> Self::Key;
}

impl Keyed for Record {
    type Key = RecordId;

    fn key(&self) -> RecordId {
        self.id()
    }
}

impl Keyed for UserRecord {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.id
    }
}

/// Outcome of the last load of a collection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    /// Load failed; the collection is empty and the reason is shown
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Ordered sequence of entries keyed by id
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    state: LoadState,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::NotLoaded,
        }
    }
}

impl<T: Keyed> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Swap in a freshly loaded sequence
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = LoadState::Loaded;
    }

    /// Empty the collection and record why loading failed
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.items = Vec::new();
        self.state = LoadState::Failed(reason.into());
    }

    /// Replace the entry with `key`, or append it. Returns the previous entry.
    pub fn upsert(&mut self, key: T::Key, item: T) -> Result<Option<T>, StoreError>
    where
        T::Key: Into<i64>,
    {
        if item.key() != key {
            return Err(StoreError::IdMismatch {
                key: key.into(),
                found: item.key().into(),
            });
        }
        match self.items.iter().position(|existing| existing.key() == key) {
            Some(index) => Ok(Some(std::mem::replace(&mut self.items[index], item))),
            None => {
                self.items.push(item);
                Ok(None)
            }
        }
    }

    /// Remove the entry with `key`, if present
    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == key)?;
        Some(self.items.remove(index))
    }
}

/// Listings and requests, one collection per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    listings: Collection<Record>,
    requests: Collection<Record>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, kind: EntityKind) -> &Collection<Record> {
        match kind {
            EntityKind::SellerListing => &self.listings,
            EntityKind::BuyerRequest => &self.requests,
        }
    }

    fn collection_mut(&mut self, kind: EntityKind) -> &mut Collection<Record> {
        match kind {
            EntityKind::SellerListing => &mut self.listings,
            EntityKind::BuyerRequest => &mut self.requests,
        }
    }

    pub fn records(&self, kind: EntityKind) -> &[Record] {
        self.collection(kind).items()
    }

    pub fn get(&self, kind: EntityKind, id: RecordId) -> Option<&Record> {
        self.collection(kind).get(id)
    }

    pub fn load_state(&self, kind: EntityKind) -> &LoadState {
        self.collection(kind).load_state()
    }

    fn check_kind(kind: EntityKind, record: &Record) -> Result<(), StoreError> {
        if record.kind() != kind {
            return Err(StoreError::KindMismatch {
                expected: kind,
                found: record.kind(),
            });
        }
        Ok(())
    }

    /// Replace a whole collection. Rejected as a unit if any record has the wrong kind.
    pub fn replace_all(&mut self, kind: EntityKind, records: Vec<Record>) -> Result<(), StoreError> {
        records
            .iter()
            .try_for_each(|record| Self::check_kind(kind, record))?;
        self.collection_mut(kind).replace_all(records);
        Ok(())
    }

    pub fn mark_failed(&mut self, kind: EntityKind, reason: impl Into<String>) {
        self.collection_mut(kind).mark_failed(reason);
    }

    pub fn upsert(
        &mut self,
        kind: EntityKind,
        id: RecordId,
        record: Record,
    ) -> Result<Option<Record>, StoreError> {
        Self::check_kind(kind, &record)?;
        self.collection_mut(kind).upsert(id, record)
    }

    pub fn remove(&mut self, kind: EntityKind, id: RecordId) -> Option<Record> {
        self.collection_mut(kind).remove(id)
    }
}
