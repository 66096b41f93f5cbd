use serde::{Deserialize, Serialize};

use orgdir_core::UserId;

/// The identity an operation acts as.
///
/// Construction is decoupled from authentication: whatever session or token
/// layer sits outside the core resolves to one of these before calling in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
}

impl Actor {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl From<UserId> for Actor {
    fn from(user_id: UserId) -> Self {
        Self { user_id }
    }
}
