//! In-memory transactional entity store.
//!
//! All tables live in one [`Tables`] snapshot behind a `RwLock`. A mutating
//! operation clones the snapshot, runs against the clone, and swaps it in only
//! on success, so a failure at any stage leaves the store unchanged. Holding
//! the write lock for the whole commit serializes concurrent mutations: two
//! creates racing on a unique key resolve to exactly one winner, and a cascade
//! delete cannot interleave with a dependent create.
//!
//! Readers take the read lock and see one consistent snapshot, so a single
//! list call's total count and returned rows always agree.
//!
//! Not optimized for large tables; uniqueness checks scan live rows.

use std::collections::BTreeMap;
use std::sync::RwLock;

use orgdir_auth::User;
use orgdir_core::{
    CompanyId, DepartmentId, OpError, OpResult, PostId, RoleId, StaffId, UserId,
};
use orgdir_directory::{Company, Department, Role, Staff};
use orgdir_posts::Post;

/// One consistent snapshot of every table.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub companies: BTreeMap<CompanyId, Company>,
    pub departments: BTreeMap<DepartmentId, Department>,
    pub roles: BTreeMap<RoleId, Role>,
    pub staff: BTreeMap<StaffId, Staff>,
    pub users: BTreeMap<UserId, User>,
    pub posts: BTreeMap<PostId, Post>,
}

impl Tables {
    /// Uniqueness of `Company.code` among live rows, excluding the row itself
    /// on update so a no-op resubmission never self-conflicts.
    pub fn company_code_unique(&self, code: &str, exclude: Option<CompanyId>) -> OpResult<()> {
        if self
            .companies
            .values()
            .any(|c| Some(c.id) != exclude && c.code == code)
        {
            return Err(OpError::duplicate("code"));
        }
        Ok(())
    }

    pub fn department_code_unique(
        &self,
        code: &str,
        exclude: Option<DepartmentId>,
    ) -> OpResult<()> {
        if self
            .departments
            .values()
            .any(|d| Some(d.id) != exclude && d.code == code)
        {
            return Err(OpError::duplicate("code"));
        }
        Ok(())
    }

    pub fn role_code_unique(&self, code: &str, exclude: Option<RoleId>) -> OpResult<()> {
        if self
            .roles
            .values()
            .any(|r| Some(r.id) != exclude && r.code == code)
        {
            return Err(OpError::duplicate("code"));
        }
        Ok(())
    }

    pub fn staff_employee_id_unique(
        &self,
        employee_id: &str,
        exclude: Option<StaffId>,
    ) -> OpResult<()> {
        if self
            .staff
            .values()
            .any(|s| Some(s.id) != exclude && s.employee_id == employee_id)
        {
            return Err(OpError::duplicate("employee_id"));
        }
        Ok(())
    }

    pub fn staff_email_unique(&self, email: &str, exclude: Option<StaffId>) -> OpResult<()> {
        if self
            .staff
            .values()
            .any(|s| Some(s.id) != exclude && s.email == email)
        {
            return Err(OpError::duplicate("email"));
        }
        Ok(())
    }

    pub fn user_email_unique(&self, email: &str, exclude: Option<UserId>) -> OpResult<()> {
        if self
            .users
            .values()
            .any(|u| Some(u.id) != exclude && u.email == email)
        {
            return Err(OpError::duplicate("email"));
        }
        Ok(())
    }
}

/// Lock-guarded store over a [`Tables`] snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read against a consistent snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> OpResult<R> {
        let guard = self
            .inner
            .read()
            .map_err(|_| OpError::conflict("store lock poisoned"))?;
        Ok(f(&guard))
    }

    /// Run a mutation transactionally: the closure operates on a draft clone
    /// of the snapshot, which replaces the live snapshot only when the closure
    /// returns `Ok`. Any error discards the draft entirely.
    pub fn commit<R>(&self, f: impl FnOnce(&mut Tables) -> OpResult<R>) -> OpResult<R> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| OpError::conflict("store lock poisoned"))?;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }
}
