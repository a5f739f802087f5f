//! Edit reconciler
//!
//! Owns the single edit session of a view:
//!
//! ```text
//! Idle ──begin──▶ Editing ──begin_commit──▶ Committing ──ack──▶ Idle
//!                  │   ▲                         │
//!                  │   └──────── failure ────────┘
//!                  └──cancel──▶ Idle
//! ```
//!
//! The reconciler never talks to the backend. It hands out a
//! [`CommitTicket`] holding a snapshot of the draft, and is told how the
//! remote call ended. Each session gets a sequence number so an answer that
//! arrives after the session was cancelled or replaced is recognised.

use crate::error::EditError;

/// Where the edit session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Idle,
    Editing,
    Committing,
}

#[derive(Debug, Clone)]
struct EditSession<D> {
    seq: u64,
    draft: D,
    committing: bool,
    last_error: Option<String>,
}

/// Snapshot of a draft handed to the remote save
#[derive(Debug, Clone)]
pub struct CommitTicket<D> {
    seq: u64,
    draft: D,
}

impl<D> CommitTicket<D> {
    pub fn draft(&self) -> &D {
        &self.draft
    }
}

/// How a finished save affects the session
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome<D> {
    /// Acknowledged; the session is closed. Merge the draft into the store.
    Applied(D),
    /// Acknowledged after the session was cancelled or replaced. The backend
    /// holds the draft now, so it is still merged; the current session is
    /// left alone.
    Detached(D),
    /// Failed; the session is back in `Editing` with its draft intact.
    Retained,
    /// Failed after the session was gone; nothing to do.
    Dropped,
}

/// Single-draft edit state machine
#[derive(Debug, Clone)]
pub struct EditReconciler<D> {
    session: Option<EditSession<D>>,
    next_seq: u64,
}

impl<D> Default for EditReconciler<D> {
    fn default() -> Self {
        Self {
            session: None,
            next_seq: 0,
        }
    }
}

impl<D: Clone> EditReconciler<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EditPhase {
        match &self.session {
            None => EditPhase::Idle,
            Some(s) if s.committing => EditPhase::Committing,
            Some(_) => EditPhase::Editing,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        self.session.as_ref().map(|s| &s.draft)
    }

    /// Reason the last save of this session failed
    pub fn last_error(&self) -> Option<&str> {
        self.session.as_ref()?.last_error.as_deref()
    }

    /// Open a session on `draft`. Any previous draft is discarded and returned.
    pub fn begin(&mut self, draft: D) -> Option<D> {
        self.next_seq += 1;
        let previous = self.session.replace(EditSession {
            seq: self.next_seq,
            draft,
            committing: false,
            last_error: None,
        });
        previous.map(|s| s.draft)
    }

    /// Replace the draft with an edited copy
    pub fn update(&mut self, edit: impl FnOnce(&mut D)) -> Result<&D, EditError> {
        let session = self.session.as_mut().ok_or(EditError::NoDraft)?;
        if session.committing {
            return Err(EditError::CommitInFlight);
        }
        let mut next = session.draft.clone();
        edit(&mut next);
        session.draft = next;
        Ok(&session.draft)
    }

    /// Enter `Committing` and snapshot the draft for the remote call
    pub fn begin_commit(&mut self) -> Result<CommitTicket<D>, EditError> {
        let session = self.session.as_mut().ok_or(EditError::NoDraft)?;
        if session.committing {
            return Err(EditError::CommitInFlight);
        }
        session.committing = true;
        Ok(CommitTicket {
            seq: session.seq,
            draft: session.draft.clone(),
        })
    }

    fn owns(&self, ticket: &CommitTicket<D>) -> bool {
        self.session.as_ref().is_some_and(|s| s.seq == ticket.seq)
    }

    /// The remote save was acknowledged
    pub fn commit_succeeded(&mut self, ticket: CommitTicket<D>) -> CommitOutcome<D> {
        if self.owns(&ticket) {
            self.session = None;
            CommitOutcome::Applied(ticket.draft)
        } else {
            CommitOutcome::Detached(ticket.draft)
        }
    }

    /// The remote save failed; keep the draft for a retry or cancel
    pub fn commit_failed(
        &mut self,
        ticket: CommitTicket<D>,
        reason: impl Into<String>,
    ) -> CommitOutcome<D> {
        match self.session.as_mut() {
            Some(session) if session.seq == ticket.seq => {
                session.committing = false;
                session.last_error = Some(reason.into());
                CommitOutcome::Retained
            }
            _ => CommitOutcome::Dropped,
        }
    }

    /// Discard the session. Allowed while committing; the in-flight save is
    /// not aborted and will come back as `Detached` or `Dropped`.
    pub fn cancel(&mut self) -> Option<D> {
        self.session.take().map(|s| s.draft)
    }
}
