use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use orgdir_auth::User;
use orgdir_core::validate::Validate;
use orgdir_core::{EntityKind, OpError, OpResult, RoleId};
use orgdir_directory::{NewRole, Role, RolePatch, Staff};

use crate::integrity;
use crate::query::{self, ListParams, Page};

use super::Directory;

/// Role with its referencing rows, attached by the show operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetail {
    pub role: Role,
    pub users: Vec<User>,
    pub staff: Vec<Staff>,
}

/// Role as it appears in listings: reference counts only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub role: Role,
    pub users_count: usize,
    pub staff_count: usize,
}

impl Directory {
    pub fn list_roles(&self, params: &ListParams) -> OpResult<Page<RoleSummary>> {
        self.store().read(|t| {
            query::run(t.roles.values(), params).map(|role| RoleSummary {
                users_count: t.users.values().filter(|u| u.role_id == role.id).count(),
                staff_count: t.staff.values().filter(|s| s.role_id == role.id).count(),
                role,
            })
        })
    }

    pub fn create_role(&self, fields: NewRole) -> OpResult<Role> {
        let role = Role::create(RoleId::new(), fields, self.now());
        role.validate()?;

        let created = self.store().commit(|t| {
            t.role_code_unique(&role.code, None)?;
            t.roles.insert(role.id, role.clone());
            Ok(role.clone())
        })?;
        debug!(role_id = %created.id, code = %created.code, "role created");
        Ok(created)
    }

    pub fn get_role(&self, id: RoleId) -> OpResult<RoleDetail> {
        self.store().read(|t| {
            let role = t.roles.get(&id).cloned().ok_or(OpError::NotFound)?;
            Ok(RoleDetail {
                users: t
                    .users
                    .values()
                    .filter(|u| u.role_id == id)
                    .cloned()
                    .collect(),
                staff: t
                    .staff
                    .values()
                    .filter(|s| s.role_id == id)
                    .cloned()
                    .collect(),
                role,
            })
        })?
    }

    pub fn update_role(&self, id: RoleId, patch: &RolePatch) -> OpResult<Role> {
        let now = self.now();
        let updated = self.store().commit(|t| {
            let current = t.roles.get(&id).ok_or(OpError::NotFound)?;
            let mut next = current.with_patch(patch);
            next.validate()?;
            t.role_code_unique(&next.code, Some(id))?;
            next.updated_at = now;
            t.roles.insert(id, next.clone());
            Ok(next)
        })?;
        debug!(role_id = %id, "role updated");
        Ok(updated)
    }

    /// Delete a role. Refused while any staff row or user account holds it.
    pub fn delete_role(&self, id: RoleId) -> OpResult<()> {
        let result = self.store().commit(|t| {
            if !t.roles.contains_key(&id) {
                return Err(OpError::NotFound);
            }
            let plan = integrity::plan_delete(t, EntityKind::Role, *id.as_uuid())?;
            integrity::apply_plan(t, &plan);
            Ok(())
        });
        if let Err(OpError::RestrictedDeletion { kind, count }) = &result {
            warn!(role_id = %id, dependent = %kind, count, "role deletion restricted");
        }
        result?;
        debug!(role_id = %id, "role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_role(code: &str) -> NewRole {
        NewRole {
            name: format!("Role {code}"),
            code: code.to_string(),
            description: None,
            permissions: vec!["staff.read".to_string()],
        }
    }

    #[test]
    fn create_update_delete_lifecycle() {
        let dir = Directory::in_memory();
        let role = dir.create_role(new_role("ADMIN")).unwrap();

        let updated = dir
            .update_role(
                role.id,
                &RolePatch {
                    description: Some(Some("Full access".to_string())),
                    ..RolePatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Full access"));
        assert_eq!(updated.code, "ADMIN");

        dir.delete_role(role.id).unwrap();
        assert_eq!(dir.get_role(role.id).unwrap_err(), OpError::NotFound);
    }

    #[test]
    fn list_carries_reference_counts() {
        let dir = Directory::in_memory();
        dir.create_role(new_role("A")).unwrap();
        dir.create_role(new_role("B")).unwrap();

        let page = dir.list_roles(&ListParams::default()).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|s| s.users_count == 0 && s.staff_count == 0));
    }

    #[test]
    fn duplicate_code_rejected() {
        let dir = Directory::in_memory();
        dir.create_role(new_role("ADMIN")).unwrap();
        assert_eq!(
            dir.create_role(new_role("ADMIN")).unwrap_err(),
            OpError::duplicate("code")
        );
    }
}
