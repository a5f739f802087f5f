//! Remote sync adapter
//!
//! Every call to the moderation backend goes through [`ModerationBackend`].
//! Calls are one-shot: no retry, no backoff, no request deduplication.
//! Concurrent writers are not reconciled; the backend keeps the last write.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::request::{StatusUpdate, VerifyUserRequest};
use shared::{
    Ack, BuyerRequest, EntityKind, ModerationState, Record, RecordId, RecordStatus,
    SellerListing, UserId, UserRecord,
};

use crate::error::{Collection, FetchError, MutationError, MutationOp, Subject};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientResult};

/// Moderation backend operations
#[async_trait]
pub trait ModerationBackend: Send + Sync {
    /// Load every record of one kind
    async fn load_all(&self, kind: EntityKind) -> Result<Vec<Record>, FetchError>;

    /// Write a new raw status for one record
    async fn set_status(
        &self,
        kind: EntityKind,
        id: RecordId,
        status: &RecordStatus,
    ) -> Result<Ack, MutationError>;

    async fn delete_record(&self, kind: EntityKind, id: RecordId) -> Result<Ack, MutationError>;

    /// Send the full record; the kind is taken from the record itself
    async fn save_edit(&self, record: &Record) -> Result<Ack, MutationError>;

    async fn load_users(&self) -> Result<Vec<UserRecord>, FetchError>;

    async fn set_user_status(
        &self,
        id: UserId,
        status: ModerationState,
    ) -> Result<Ack, MutationError>;

    /// Send the full user record
    async fn save_user(&self, user: &UserRecord) -> Result<Ack, MutationError>;

    async fn delete_user(&self, id: UserId) -> Result<Ack, MutationError>;
}

#[async_trait]
impl<T: ModerationBackend + ?Sized> ModerationBackend for Arc<T> {
    async fn load_all(&self, kind: EntityKind) -> Result<Vec<Record>, FetchError> {
        (**self).load_all(kind).await
    }

    async fn set_status(
        &self,
        kind: EntityKind,
        id: RecordId,
        status: &RecordStatus,
    ) -> Result<Ack, MutationError> {
        (**self).set_status(kind, id, status).await
    }

    async fn delete_record(&self, kind: EntityKind, id: RecordId) -> Result<Ack, MutationError> {
        (**self).delete_record(kind, id).await
    }

    async fn save_edit(&self, record: &Record) -> Result<Ack, MutationError> {
        (**self).save_edit(record).await
    }

    async fn load_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        (**self).load_users().await
    }

    async fn set_user_status(
        &self,
        id: UserId,
        status: ModerationState,
    ) -> Result<Ack, MutationError> {
        (**self).set_user_status(id, status).await
    }

    async fn save_user(&self, user: &UserRecord) -> Result<Ack, MutationError> {
        (**self).save_user(user).await
    }

    async fn delete_user(&self, id: UserId) -> Result<Ack, MutationError> {
        (**self).delete_user(id).await
    }
}

/// Backend route table
pub mod routes {
    use shared::{EntityKind, RecordId, UserId};

    pub const USERS: &str = "admin/users";
    pub const VERIFY_USER: &str = "admin/verify-user";
    pub const EDIT_USER: &str = "admin/edit-user";

    pub fn collection(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::SellerListing => "admin/seller-listings",
            EntityKind::BuyerRequest => "admin/buyer-requests",
        }
    }

    pub fn update_status(kind: EntityKind, id: RecordId) -> String {
        format!("admin/update-{}-status/{}", kind.noun(), id)
    }

    pub fn update(kind: EntityKind, id: RecordId) -> String {
        format!("admin/update-{}/{}", kind.noun(), id)
    }

    pub fn delete(kind: EntityKind, id: RecordId) -> String {
        format!("admin/delete-{}/{}", kind.noun(), id)
    }

    pub fn delete_user(id: UserId) -> String {
        format!("admin/delete-user/{}", id)
    }

    /// Absolute URL of an uploaded user document
    pub fn document(base_url: &str, docs: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            docs.trim_start_matches('/')
        )
    }
}

/// Interpret a mutation response body as an acknowledgement
fn ack_from(body: Value) -> Ack {
    match body {
        Value::String(message) => Ack::with_message(message),
        Value::Object(map) => Ack {
            message: map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        _ => Ack::default(),
    }
}

/// HTTP implementation of [`ModerationBackend`]
#[derive(Debug, Clone)]
pub struct AdminApi<H = NetworkHttpClient> {
    http: H,
}

impl AdminApi<NetworkHttpClient> {
    /// Build the adapter over a network client
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(config.build_http_client()?))
    }
}

impl<H: HttpClient> AdminApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    async fn mutate_put<B: serde::Serialize + Sync>(
        &self,
        op: MutationOp,
        subject: Subject,
        path: &str,
        body: &B,
    ) -> Result<Ack, MutationError> {
        tracing::debug!(%subject, %op, path, "Sending mutation");
        self.http
            .put::<Value, _>(path, body)
            .await
            .map(ack_from)
            .map_err(|source| MutationError::Remote {
                op,
                subject,
                source,
            })
    }
}

#[async_trait]
impl<H: HttpClient> ModerationBackend for AdminApi<H> {
    async fn load_all(&self, kind: EntityKind) -> Result<Vec<Record>, FetchError> {
        let collection = Collection::Records(kind);
        let path = routes::collection(kind);
        tracing::debug!(%collection, path, "Loading collection");

        let records = match kind {
            EntityKind::SellerListing => self
                .http
                .get::<Vec<SellerListing>>(path)
                .await
                .map(|rows| rows.into_iter().map(Record::Listing).collect()),
            EntityKind::BuyerRequest => self
                .http
                .get::<Vec<BuyerRequest>>(path)
                .await
                .map(|rows| rows.into_iter().map(Record::Request).collect()),
        };
        records.map_err(|source| FetchError::Remote { collection, source })
    }

    async fn set_status(
        &self,
        kind: EntityKind,
        id: RecordId,
        status: &RecordStatus,
    ) -> Result<Ack, MutationError> {
        let body = StatusUpdate {
            status: status.clone(),
        };
        self.mutate_put(
            MutationOp::SetStatus,
            Subject::Record(kind, id),
            &routes::update_status(kind, id),
            &body,
        )
        .await
    }

    async fn delete_record(&self, kind: EntityKind, id: RecordId) -> Result<Ack, MutationError> {
        let subject = Subject::Record(kind, id);
        tracing::debug!(%subject, "Deleting record");
        self.http
            .delete::<Value>(&routes::delete(kind, id))
            .await
            .map(ack_from)
            .map_err(|source| MutationError::Remote {
                op: MutationOp::Delete,
                subject,
                source,
            })
    }

    async fn save_edit(&self, record: &Record) -> Result<Ack, MutationError> {
        let (kind, id) = (record.kind(), record.id());
        self.mutate_put(
            MutationOp::Save,
            Subject::Record(kind, id),
            &routes::update(kind, id),
            record,
        )
        .await
    }

    async fn load_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        tracing::debug!(path = routes::USERS, "Loading users");
        self.http
            .get::<Vec<UserRecord>>(routes::USERS)
            .await
            .map_err(|source| FetchError::Remote {
                collection: Collection::Users,
                source,
            })
    }

    async fn set_user_status(
        &self,
        id: UserId,
        status: ModerationState,
    ) -> Result<Ack, MutationError> {
        let subject = Subject::User(id);
        tracing::debug!(%subject, %status, "Updating user status");
        let body = VerifyUserRequest {
            user_id: id,
            status,
        };
        self.http
            .post::<Value, _>(routes::VERIFY_USER, &body)
            .await
            .map(ack_from)
            .map_err(|source| MutationError::Remote {
                op: MutationOp::SetStatus,
                subject,
                source,
            })
    }

    async fn save_user(&self, user: &UserRecord) -> Result<Ack, MutationError> {
        self.mutate_put(
            MutationOp::Save,
            Subject::User(user.id),
            routes::EDIT_USER,
            user,
        )
        .await
    }

    async fn delete_user(&self, id: UserId) -> Result<Ack, MutationError> {
        let subject = Subject::User(id);
        tracing::debug!(%subject, "Deleting user");
        self.http
            .delete::<Value>(&routes::delete_user(id))
            .await
            .map(ack_from)
            .map_err(|source| MutationError::Remote {
                op: MutationOp::Delete,
                subject,
                source,
            })
    }
}
