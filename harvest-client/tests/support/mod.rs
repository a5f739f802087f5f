//! Scripted in-memory moderation backend for console tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use harvest_client::error::{Collection, MutationOp, Subject};
use harvest_client::{ClientError, FetchError, ModerationBackend, MutationError};
use shared::{
    Ack, BuyerRequest, EntityKind, ModerationState, Record, RecordId, RecordStatus,
    SellerListing, UserId, UserRecord, UserRole,
};
use tokio::sync::Notify;

/// Backend holding its rows in memory.
///
/// Loads and mutations can be made to fail, and mutations can be held until
/// [`ScriptedBackend::release`] is called.
#[derive(Default)]
pub struct ScriptedBackend {
    listings: Mutex<Vec<Record>>,
    requests: Mutex<Vec<Record>>,
    users: Mutex<Vec<UserRecord>>,
    fail_loads: AtomicBool,
    fail_mutations: AtomicBool,
    hold_mutations: AtomicBool,
    entered: Notify,
    gate: Notify,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(listings: Vec<Record>, requests: Vec<Record>, users: Vec<UserRecord>) -> Self {
        Self {
            listings: Mutex::new(listings),
            requests: Mutex::new(requests),
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn hold_mutations(&self, hold: bool) {
        self.hold_mutations.store(hold, Ordering::SeqCst);
    }

    /// Wait until a held mutation has reached the backend
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held mutation through
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn rows(&self, kind: EntityKind) -> &Mutex<Vec<Record>> {
        match kind {
            EntityKind::SellerListing => &self.listings,
            EntityKind::BuyerRequest => &self.requests,
        }
    }

    async fn mutate(&self, op: MutationOp, subject: Subject) -> Result<(), MutationError> {
        self.calls.lock().unwrap().push(format!("{op} {subject}"));
        if self.hold_mutations.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(MutationError::Remote {
                op,
                subject,
                source: ClientError::Server {
                    status: 503,
                    message: "backend unavailable".into(),
                },
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ModerationBackend for ScriptedBackend {
    async fn load_all(&self, kind: EntityKind) -> Result<Vec<Record>, FetchError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(FetchError::Remote {
                collection: Collection::Records(kind),
                source: ClientError::Server {
                    status: 500,
                    message: "database offline".into(),
                },
            });
        }
        Ok(self.rows(kind).lock().unwrap().clone())
    }

    async fn set_status(
        &self,
        kind: EntityKind,
        id: RecordId,
        status: &RecordStatus,
    ) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::SetStatus, Subject::Record(kind, id))
            .await?;
        let mut rows = self.rows(kind).lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id() == id) {
            *row = row.with_status(status.clone());
        }
        Ok(Ack::with_message(format!("status set to {status}")))
    }

    async fn delete_record(&self, kind: EntityKind, id: RecordId) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::Delete, Subject::Record(kind, id))
            .await?;
        self.rows(kind).lock().unwrap().retain(|r| r.id() != id);
        Ok(Ack::default())
    }

    async fn save_edit(&self, record: &Record) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::Save, Subject::Record(record.kind(), record.id()))
            .await?;
        let mut rows = self.rows(record.kind()).lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id() == record.id()) {
            *row = record.clone();
        }
        Ok(Ack::default())
    }

    async fn load_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(FetchError::Remote {
                collection: Collection::Users,
                source: ClientError::Server {
                    status: 500,
                    message: "database offline".into(),
                },
            });
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_user_status(
        &self,
        id: UserId,
        status: ModerationState,
    ) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::SetStatus, Subject::User(id)).await?;
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.status = status.into();
        }
        Ok(Ack::default())
    }

    async fn save_user(&self, user: &UserRecord) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::Save, Subject::User(user.id)).await?;
        if let Some(row) = self.users.lock().unwrap().iter_mut().find(|u| u.id == user.id) {
            *row = user.clone();
        }
        Ok(Ack::default())
    }

    async fn delete_user(&self, id: UserId) -> Result<Ack, MutationError> {
        self.mutate(MutationOp::Delete, Subject::User(id)).await?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(Ack::with_message("User deleted"))
    }
}

pub fn listing(id: RecordId, name: &str, location: &str, status: &str) -> Record {
    Record::Listing(SellerListing {
        id,
        item_name: name.into(),
        location: location.into(),
        area: "Central".into(),
        quantity: 25.0,
        unit_price: 180.0,
        harvest_date: "2025-03-24".into(),
        status: RecordStatus::parse(status),
    })
}

pub fn request(id: RecordId, name: &str, bid_from: f64, bid_to: f64, status: &str) -> Record {
    Record::Request(BuyerRequest {
        id,
        item_name: name.into(),
        location: "Colombo".into(),
        area: "Manning Market".into(),
        quantity: 100.0,
        bid_from,
        bid_to,
        required_date: "2025-04-02".into(),
        status: RecordStatus::parse(status),
    })
}

pub fn user(id: UserId, name: &str, role: UserRole, status: ModerationState) -> UserRecord {
    UserRecord {
        id,
        name: Some(name.into()),
        email: Some(format!("{}@harvest.lk", name.to_lowercase().replace(' ', "."))),
        role,
        status: status.into(),
        created_at: Some("2025-02-11T08:30:00.000Z".into()),
        docs: Some(format!("uploads/user-{id}.pdf")),
    }
}

/// Five listings (3 pending, 1 verified, 1 rejected), three requests,
/// and eight users
pub fn marketplace() -> ScriptedBackend {
    ScriptedBackend::new(
        vec![
            listing(1, "Organic Tomatoes", "Nuwara Eliya", "pending"),
            listing(2, "Fresh Cucumbers", "Dambulla", "verified"),
            listing(3, "Red Onions", "Jaffna", "pending"),
            listing(4, "Eggplants", "Matale", "pending"),
            listing(5, "Green Peppers", "Kandy", "rejected"),
        ],
        vec![
            request(1, "Potatoes", 90.0, 120.0, "pending"),
            request(2, "Carrots", 150.0, 190.0, "active"),
            request(3, "Leeks", 60.0, 80.0, "pending"),
        ],
        (1..=8)
            .map(|id| {
                let role = if id % 2 == 0 { UserRole::Buyer } else { UserRole::Farmer };
                let status = if id % 3 == 0 {
                    ModerationState::Verified
                } else {
                    ModerationState::Pending
                };
                user(id, &format!("User {id}"), role, status)
            })
            .collect(),
    )
}
