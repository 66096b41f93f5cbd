//! Ownership gate for owner-scoped resources.

use orgdir_core::{OpError, OpResult, UserId};

use crate::Actor;

/// Permit mutation only when the actor is the recorded owner.
///
/// - No IO
/// - No panics
/// - Evaluated before validation, so an unauthorized caller learns nothing
///   about whether their payload would otherwise have been accepted.
pub fn ensure_owner(actor: &Actor, owner: UserId) -> OpResult<()> {
    if actor.user_id == owner {
        Ok(())
    } else {
        Err(OpError::Forbidden)
    }
}
