//! Moderation console
//!
//! The injected service behind the admin views. It owns the entity store,
//! the user directory, the filter state and both edit sessions, and drives
//! the backend through [`ModerationBackend`].
//!
//! Every store write happens after the matching remote call resolved, under
//! a short write lock that is never held across an await. After
//! [`ModerationConsole::shutdown`] no result is applied any more.

use std::sync::Arc;

use shared::{
    Ack, EntityKind, ModerationAction, ModerationState, Record, RecordId, RecordStatus, UserId,
    UserRecord,
};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::draft::{DraftEdit, ListingDraft, UserEdit};
use crate::error::{
    Collection as CollectionName, ConsoleError, ConsoleResult, EditError, FetchError,
    MutationError, MutationOp, Subject,
};
use crate::filter::{FilterState, StatusFilter, search_users};
use crate::reconciler::{CommitOutcome, EditPhase, EditReconciler};
use crate::remote::{AdminApi, ModerationBackend, routes};
use crate::store::{Collection, EntityStore, Keyed, LoadState};
use crate::tasks::{Cancelled, TaskScope};
use crate::{ClientConfig, ClientResult};

#[derive(Debug, Default)]
struct ConsoleState {
    store: EntityStore,
    users: Collection<UserRecord>,
    filter: FilterState,
    user_search: String,
    listing_edit: EditReconciler<ListingDraft>,
    user_edit: EditReconciler<UserRecord>,
}

struct Inner<B> {
    backend: B,
    state: RwLock<ConsoleState>,
    scope: TaskScope,
    docs_base_url: String,
}

/// Moderation workflow over one backend. Cheap to clone.
pub struct ModerationConsole<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for ModerationConsole<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ModerationConsole<AdminApi> {
    /// Console over the HTTP backend described by `config`
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(AdminApi::from_config(config)?, config))
    }
}

impl<B: ModerationBackend> ModerationConsole<B> {
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                state: RwLock::new(ConsoleState::default()),
                scope: TaskScope::new(),
                docs_base_url: config.docs_base_url().to_string(),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Write access to the state, unless the console was shut down
    async fn live_state(&self) -> Option<RwLockWriteGuard<'_, ConsoleState>> {
        let state = self.inner.state.write().await;
        (!self.inner.scope.is_cancelled()).then_some(state)
    }

    async fn mutation(
        &self,
        op: MutationOp,
        subject: Subject,
        call: impl Future<Output = Result<Ack, MutationError>>,
    ) -> Result<Ack, MutationError> {
        let result = match self.inner.scope.run(call).await {
            Ok(result) => result,
            Err(Cancelled) => Err(MutationError::Cancelled { op, subject }),
        };
        if let Err(e) = &result {
            tracing::warn!(%subject, %op, error = %e, "Mutation failed");
        }
        result
    }

    // ========== Loading ==========

    /// Load one kind from the backend and replace its collection.
    ///
    /// On failure the collection is emptied and marked failed.
    pub async fn load(&self, kind: EntityKind) -> ConsoleResult<usize> {
        let collection = CollectionName::Records(kind);
        tracing::debug!(%collection, "Loading");

        let result = match self.inner.scope.run(self.inner.backend.load_all(kind)).await {
            Ok(result) => result,
            Err(Cancelled) => return Err(FetchError::Cancelled { collection }.into()),
        };
        let mut state = self
            .live_state()
            .await
            .ok_or(FetchError::Cancelled { collection })?;

        match result {
            Ok(records) => {
                let count = records.len();
                if let Err(e) = state.store.replace_all(kind, records) {
                    tracing::error!(%collection, error = %e, "Backend returned foreign records");
                    state.store.mark_failed(kind, e.to_string());
                    return Err(e.into());
                }
                tracing::info!(%collection, count, "Loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(%collection, error = %e, "Load failed");
                state.store.mark_failed(kind, e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn load_users(&self) -> ConsoleResult<usize> {
        let collection = CollectionName::Users;
        tracing::debug!(%collection, "Loading");

        let result = match self.inner.scope.run(self.inner.backend.load_users()).await {
            Ok(result) => result,
            Err(Cancelled) => return Err(FetchError::Cancelled { collection }.into()),
        };
        let mut state = self
            .live_state()
            .await
            .ok_or(FetchError::Cancelled { collection })?;

        match result {
            Ok(users) => {
                let count = users.len();
                state.users.replace_all(users);
                tracing::info!(%collection, count, "Loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(%collection, error = %e, "Load failed");
                state.users.mark_failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Load both kinds and the user directory concurrently.
    ///
    /// Returns the failures; each failed collection is already marked.
    pub async fn refresh(&self) -> Vec<ConsoleError> {
        let (listings, requests, users) = tokio::join!(
            self.load(EntityKind::SellerListing),
            self.load(EntityKind::BuyerRequest),
            self.load_users(),
        );
        [listings.err(), requests.err(), users.err()]
            .into_iter()
            .flatten()
            .collect()
    }

    // ========== Queries ==========

    /// Copy of the entity store
    pub async fn store(&self) -> EntityStore {
        self.inner.state.read().await.store.clone()
    }

    pub async fn records(&self, kind: EntityKind) -> Vec<Record> {
        self.inner.state.read().await.store.records(kind).to_vec()
    }

    pub async fn record(&self, kind: EntityKind, id: RecordId) -> Option<Record> {
        self.inner.state.read().await.store.get(kind, id).cloned()
    }

    pub async fn load_state(&self, kind: EntityKind) -> LoadState {
        self.inner.state.read().await.store.load_state(kind).clone()
    }

    /// Records passing the current tab, status filter and search term
    pub async fn visible(&self) -> Vec<Record> {
        let state = self.inner.state.read().await;
        state
            .filter
            .apply(&state.store)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn filter(&self) -> FilterState {
        self.inner.state.read().await.filter.clone()
    }

    pub async fn select_tab(&self, tab: EntityKind) {
        self.inner.state.write().await.filter.select_tab(tab);
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.inner.state.write().await.filter.set_status(status);
    }

    pub async fn set_search(&self, term: impl Into<String>) {
        self.inner.state.write().await.filter.set_search(term);
    }

    pub async fn status_options(&self) -> Vec<StatusFilter> {
        self.inner.state.read().await.filter.status_options()
    }

    // ========== Moderation ==========

    /// Write a raw status to one record, then mirror it locally
    pub async fn set_status(
        &self,
        kind: EntityKind,
        id: RecordId,
        status: RecordStatus,
    ) -> ConsoleResult<Ack> {
        let subject = Subject::Record(kind, id);
        if self.record(kind, id).await.is_none() {
            return Err(ConsoleError::NotFound(subject));
        }

        let ack = self
            .mutation(
                MutationOp::SetStatus,
                subject,
                self.inner.backend.set_status(kind, id, &status),
            )
            .await?;

        let mut state = self.live_state().await.ok_or(MutationError::Cancelled {
            op: MutationOp::SetStatus,
            subject,
        })?;
        let updated = state.store.get(kind, id).map(|r| r.with_status(status.clone()));
        match updated {
            Some(updated) => {
                state.store.upsert(kind, id, updated)?;
                tracing::info!(%subject, %status, "Status updated");
            }
            None => tracing::debug!(%subject, "Record gone before status update applied"),
        }
        Ok(ack)
    }

    /// Apply a moderation action to a pending record
    pub async fn moderate(
        &self,
        kind: EntityKind,
        id: RecordId,
        action: ModerationAction,
    ) -> ConsoleResult<Ack> {
        let subject = Subject::Record(kind, id);
        let current = self
            .record(kind, id)
            .await
            .ok_or(ConsoleError::NotFound(subject))?;
        let target = action.target();
        if !current.status().can_transition(target) {
            return Err(ConsoleError::IllegalTransition {
                subject,
                from: current.status().to_string(),
                to: target.as_str(),
            });
        }
        self.set_status(kind, id, RecordStatus::for_state(kind, target))
            .await
    }

    pub async fn verify(&self, kind: EntityKind, id: RecordId) -> ConsoleResult<Ack> {
        self.moderate(kind, id, ModerationAction::Verify).await
    }

    pub async fn reject(&self, kind: EntityKind, id: RecordId) -> ConsoleResult<Ack> {
        self.moderate(kind, id, ModerationAction::Reject).await
    }

    /// Delete one record. An open draft of it is discarded.
    pub async fn delete(&self, kind: EntityKind, id: RecordId) -> ConsoleResult<Ack> {
        let subject = Subject::Record(kind, id);
        if self.record(kind, id).await.is_none() {
            return Err(ConsoleError::NotFound(subject));
        }

        let ack = self
            .mutation(
                MutationOp::Delete,
                subject,
                self.inner.backend.delete_record(kind, id),
            )
            .await?;

        let mut state = self.live_state().await.ok_or(MutationError::Cancelled {
            op: MutationOp::Delete,
            subject,
        })?;
        state.store.remove(kind, id);
        if state
            .listing_edit
            .draft()
            .is_some_and(|draft| draft.key() == (kind, id))
        {
            state.listing_edit.cancel();
            tracing::debug!(%subject, "Discarded draft of deleted record");
        }
        tracing::info!(%subject, "Deleted");
        Ok(ack)
    }

    // ========== Editing ==========

    /// Open the edit session on one record. Any unsaved draft is discarded.
    pub async fn begin_edit(&self, kind: EntityKind, id: RecordId) -> ConsoleResult<ListingDraft> {
        let mut state = self.inner.state.write().await;
        let draft = state
            .store
            .get(kind, id)
            .map(ListingDraft::from)
            .ok_or(ConsoleError::NotFound(Subject::Record(kind, id)))?;
        if let Some(previous) = state.listing_edit.begin(draft.clone()) {
            let (kind, id) = previous.key();
            tracing::debug!(subject = %Subject::Record(kind, id), "Discarded unsaved draft");
        }
        Ok(draft)
    }

    pub async fn edit(&self, edit: DraftEdit) -> ConsoleResult<ListingDraft> {
        let mut state = self.inner.state.write().await;
        let draft = state.listing_edit.update(|draft| draft.apply(edit))?;
        Ok(draft.clone())
    }

    pub async fn draft(&self) -> Option<ListingDraft> {
        self.inner.state.read().await.listing_edit.draft().cloned()
    }

    pub async fn edit_phase(&self) -> EditPhase {
        self.inner.state.read().await.listing_edit.phase()
    }

    /// Why the last save of the open draft failed
    pub async fn edit_error(&self) -> Option<String> {
        let state = self.inner.state.read().await;
        state.listing_edit.last_error().map(str::to_string)
    }

    pub async fn cancel_edit(&self) -> Option<ListingDraft> {
        self.inner.state.write().await.listing_edit.cancel()
    }

    /// Send the draft to the backend.
    ///
    /// On success the store takes the locally held draft and the session
    /// closes, unless the record was deleted meanwhile. On failure the draft stays open with the error recorded.
    pub async fn save_edit(&self) -> ConsoleResult<Ack> {
        let (ticket, record) = {
            let mut state = self.inner.state.write().await;
            let record = state
                .listing_edit
                .draft()
                .ok_or(EditError::NoDraft)?
                .to_record()?;
            (state.listing_edit.begin_commit()?, record)
        };
        let (kind, id) = (record.kind(), record.id());
        let subject = Subject::Record(kind, id);

        let result = self
            .mutation(
                MutationOp::Save,
                subject,
                self.inner.backend.save_edit(&record),
            )
            .await;

        let Some(mut state) = self.live_state().await else {
            return Err(result
                .err()
                .unwrap_or(MutationError::Cancelled {
                    op: MutationOp::Save,
                    subject,
                })
                .into());
        };
        match result {
            Ok(ack) => {
                if let CommitOutcome::Detached(_) = state.listing_edit.commit_succeeded(ticket) {
                    tracing::info!(%subject, "Save acknowledged after its edit session closed");
                }
                // A save never brings back a record deleted while it was in flight
                if state.store.get(kind, id).is_none() {
                    tracing::debug!(%subject, "Record gone before save applied");
                    return Ok(ack);
                }
                state.store.upsert(kind, id, record)?;
                tracing::info!(%subject, "Saved");
                Ok(ack)
            }
            Err(e) => {
                state.listing_edit.commit_failed(ticket, e.to_string());
                Err(e.into())
            }
        }
    }

    // ========== Users ==========

    pub async fn users(&self) -> Vec<UserRecord> {
        self.inner.state.read().await.users.items().to_vec()
    }

    pub async fn user(&self, id: UserId) -> Option<UserRecord> {
        self.inner.state.read().await.users.get(id).cloned()
    }

    pub async fn users_load_state(&self) -> LoadState {
        self.inner.state.read().await.users.load_state().clone()
    }

    pub async fn set_user_search(&self, term: impl Into<String>) {
        self.inner.state.write().await.user_search = term.into();
    }

    /// Users matching the current user search term
    pub async fn visible_users(&self) -> Vec<UserRecord> {
        let state = self.inner.state.read().await;
        search_users(state.users.items(), &state.user_search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn set_user_status(&self, id: UserId, status: ModerationState) -> ConsoleResult<Ack> {
        let subject = Subject::User(id);
        if self.user(id).await.is_none() {
            return Err(ConsoleError::NotFound(subject));
        }

        let ack = self
            .mutation(
                MutationOp::SetStatus,
                subject,
                self.inner.backend.set_user_status(id, status),
            )
            .await?;

        let mut state = self.live_state().await.ok_or(MutationError::Cancelled {
            op: MutationOp::SetStatus,
            subject,
        })?;
        let current = state.users.get(id).cloned();
        match current {
            Some(mut user) => {
                user.status = status.into();
                state.users.upsert(id, user)?;
                tracing::info!(%subject, %status, "User status updated");
            }
            None => tracing::debug!(%subject, "User gone before status update applied"),
        }
        Ok(ack)
    }

    /// Verified users go back to pending, everyone else becomes verified.
    /// Returns the new status.
    pub async fn toggle_user_verification(&self, id: UserId) -> ConsoleResult<ModerationState> {
        let target = self
            .user(id)
            .await
            .ok_or(ConsoleError::NotFound(Subject::User(id)))?
            .toggled_status();
        self.set_user_status(id, target).await?;
        Ok(target)
    }

    pub async fn delete_user(&self, id: UserId) -> ConsoleResult<Ack> {
        let subject = Subject::User(id);
        if self.user(id).await.is_none() {
            return Err(ConsoleError::NotFound(subject));
        }

        let ack = self
            .mutation(MutationOp::Delete, subject, self.inner.backend.delete_user(id))
            .await?;

        let mut state = self.live_state().await.ok_or(MutationError::Cancelled {
            op: MutationOp::Delete,
            subject,
        })?;
        state.users.remove(id);
        if state.user_edit.draft().is_some_and(|draft| draft.key() == id) {
            state.user_edit.cancel();
        }
        tracing::info!(%subject, "Deleted");
        Ok(ack)
    }

    pub async fn begin_user_edit(&self, id: UserId) -> ConsoleResult<UserRecord> {
        let mut state = self.inner.state.write().await;
        let draft = state
            .users
            .get(id)
            .cloned()
            .ok_or(ConsoleError::NotFound(Subject::User(id)))?;
        if let Some(previous) = state.user_edit.begin(draft.clone()) {
            tracing::debug!(subject = %Subject::User(previous.id), "Discarded unsaved draft");
        }
        Ok(draft)
    }

    pub async fn edit_user(&self, edit: UserEdit) -> ConsoleResult<UserRecord> {
        let mut state = self.inner.state.write().await;
        let draft = state.user_edit.update(|user| edit.apply(user))?;
        Ok(draft.clone())
    }

    pub async fn user_draft(&self) -> Option<UserRecord> {
        self.inner.state.read().await.user_edit.draft().cloned()
    }

    pub async fn user_edit_phase(&self) -> EditPhase {
        self.inner.state.read().await.user_edit.phase()
    }

    pub async fn cancel_user_edit(&self) -> Option<UserRecord> {
        self.inner.state.write().await.user_edit.cancel()
    }

    pub async fn save_user_edit(&self) -> ConsoleResult<Ack> {
        let ticket = self.inner.state.write().await.user_edit.begin_commit()?;
        let user = ticket.draft().clone();
        let subject = Subject::User(user.id);

        let result = self
            .mutation(MutationOp::Save, subject, self.inner.backend.save_user(&user))
            .await;

        let Some(mut state) = self.live_state().await else {
            return Err(result
                .err()
                .unwrap_or(MutationError::Cancelled {
                    op: MutationOp::Save,
                    subject,
                })
                .into());
        };
        match result {
            Ok(ack) => {
                state.user_edit.commit_succeeded(ticket);
                if state.users.get(user.id).is_none() {
                    tracing::debug!(%subject, "User gone before save applied");
                    return Ok(ack);
                }
                state.users.upsert(user.id, user)?;
                tracing::info!(%subject, "Saved");
                Ok(ack)
            }
            Err(e) => {
                state.user_edit.commit_failed(ticket, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Absolute URL of the user's uploaded document, if any
    pub async fn document_url(&self, id: UserId) -> ConsoleResult<Option<String>> {
        let user = self
            .user(id)
            .await
            .ok_or(ConsoleError::NotFound(Subject::User(id)))?;
        Ok(user
            .docs
            .as_deref()
            .filter(|docs| !docs.trim().is_empty())
            .map(|docs| routes::document(&self.inner.docs_base_url, docs)))
    }

    // ========== Lifetime ==========

    /// Tear down the view.
    ///
    /// In-flight calls stop being awaited, and nothing that resolves later
    /// touches the store or the drafts.
    pub async fn shutdown(&self) {
        self.inner.scope.cancel();
        // Wait out any write section that started before the cancel.
        let _state = self.inner.state.write().await;
        tracing::info!("Moderation console shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.scope.is_cancelled()
    }
}
