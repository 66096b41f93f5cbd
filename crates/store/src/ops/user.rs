use tracing::{debug, info};

use orgdir_auth::{NewUser, User};
use orgdir_core::validate::Validate;
use orgdir_core::{EntityKind, OpError, OpResult, UserId};

use crate::integrity;

use super::Directory;

impl Directory {
    /// Register an account. The role must already exist; emails are unique
    /// across accounts.
    pub fn register_user(&self, fields: NewUser) -> OpResult<User> {
        let user = User::create(UserId::new(), fields, self.now());
        user.validate()?;

        let user = self.store().commit(|t| {
            if !t.roles.contains_key(&user.role_id) {
                return Err(OpError::dangling("role_id"));
            }
            t.user_email_unique(&user.email, None)?;
            t.users.insert(user.id, user.clone());
            Ok(user)
        })?;
        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> OpResult<User> {
        self.store()
            .read(|t| t.users.get(&id).cloned().ok_or(OpError::NotFound))?
    }

    /// Deleting an account unlinks it from any staff records that pointed at
    /// it; the staff rows themselves survive.
    pub fn delete_user(&self, id: UserId) -> OpResult<()> {
        let plan = self.store().commit(|t| {
            if !t.users.contains_key(&id) {
                return Err(OpError::NotFound);
            }
            let plan = integrity::plan_delete(t, EntityKind::User, *id.as_uuid())?;
            integrity::apply_plan(t, &plan);
            Ok(plan)
        })?;
        info!(
            user_id = %id,
            unlinked_staff = plan.unlink_staff.len(),
            "user deleted"
        );
        Ok(())
    }
}
