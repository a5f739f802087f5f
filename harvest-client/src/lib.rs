//! Harvest Client - moderation engine for the Harvest admin console
//!
//! Talks to the moderation backend over HTTP and keeps the console's local
//! view of it: the entity store, the filter engine, the edit reconciler and
//! the user directory, wired together by [`ModerationConsole`].

pub mod config;
pub mod console;
pub mod draft;
pub mod error;
pub mod filter;
pub mod http;
pub mod logger;
pub mod reconciler;
pub mod remote;
pub mod store;
pub mod tasks;

pub use config::ClientConfig;
pub use console::ModerationConsole;
pub use draft::{DraftEdit, ListingDraft, PriceField, UserEdit};
pub use error::{
    ClientError, ClientResult, ConsoleError, ConsoleResult, EditError, FetchError, MutationError,
    StoreError,
};
pub use filter::{FilterState, StatusFilter};
pub use http::{HttpClient, NetworkHttpClient};
pub use logger::{init_json_logger, init_logger};
pub use reconciler::{CommitOutcome, EditPhase, EditReconciler};
pub use remote::{AdminApi, ModerationBackend};
pub use store::{EntityStore, LoadState};
pub use tasks::{Cancelled, TaskScope};

// Re-export shared types for convenience
pub use shared::{
    Ack, BuyerRequest, EntityKind, ModerationAction, ModerationState, Record, RecordId,
    RecordStatus, SellerListing, UserId, UserRecord, UserRole,
};
