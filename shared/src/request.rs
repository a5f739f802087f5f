//! Request bodies sent to the moderation backend

use serde::{Deserialize, Serialize};

use crate::models::UserId;
use crate::status::{ModerationState, RecordStatus};

/// Body of `PUT /admin/update-{listing,request}-status/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RecordStatus,
}

/// Body of `POST /admin/verify-user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyUserRequest {
    pub user_id: UserId,
    pub status: ModerationState,
}
