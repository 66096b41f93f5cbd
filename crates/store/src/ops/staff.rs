use serde::{Deserialize, Serialize};
use tracing::debug;

use orgdir_auth::User;
use orgdir_core::validate::Validate;
use orgdir_core::{OpError, OpResult, StaffId};
use orgdir_directory::{Company, Department, NewStaff, Role, Staff, StaffPatch};

use crate::engine::Tables;
use crate::integrity;
use crate::query::{self, ListParams, Page};

use super::Directory;

/// Staff row with every core relation attached, so callers never need a
/// second round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDetail {
    pub staff: Staff,
    pub user: Option<User>,
    pub company: Company,
    pub department: Department,
    pub role: Role,
}

fn attach_relations(t: &Tables, staff: Staff) -> OpResult<StaffDetail> {
    let company = t
        .companies
        .get(&staff.company_id)
        .cloned()
        .ok_or(OpError::dangling("company_id"))?;
    let department = t
        .departments
        .get(&staff.department_id)
        .cloned()
        .ok_or(OpError::dangling("department_id"))?;
    let role = t
        .roles
        .get(&staff.role_id)
        .cloned()
        .ok_or(OpError::dangling("role_id"))?;
    let user = staff.user_id.and_then(|id| t.users.get(&id).cloned());
    Ok(StaffDetail {
        staff,
        user,
        company,
        department,
        role,
    })
}

impl Directory {
    pub fn list_staff(&self, params: &ListParams) -> OpResult<Page<StaffDetail>> {
        self.store().read(|t| {
            let page = query::run(t.staff.values(), params);
            let mut items = Vec::with_capacity(page.items.len());
            for staff in page.items {
                items.push(attach_relations(t, staff)?);
            }
            Ok(Page {
                items,
                page: page.page,
                per_page: page.per_page,
                total: page.total,
                total_pages: page.total_pages,
            })
        })?
    }

    pub fn create_staff(&self, fields: NewStaff) -> OpResult<StaffDetail> {
        let staff = Staff::create(StaffId::new(), fields, self.now());
        staff.validate()?;

        let detail = self.store().commit(|t| {
            integrity::check_staff_refs(t, &staff)?;
            t.staff_employee_id_unique(&staff.employee_id, None)?;
            t.staff_email_unique(&staff.email, None)?;
            t.staff.insert(staff.id, staff.clone());
            attach_relations(t, staff.clone())
        })?;
        debug!(staff_id = %detail.staff.id, employee_id = %detail.staff.employee_id, "staff created");
        Ok(detail)
    }

    pub fn get_staff(&self, id: StaffId) -> OpResult<StaffDetail> {
        self.store().read(|t| {
            let staff = t.staff.get(&id).cloned().ok_or(OpError::NotFound)?;
            attach_relations(t, staff)
        })?
    }

    pub fn update_staff(&self, id: StaffId, patch: &StaffPatch) -> OpResult<StaffDetail> {
        let now = self.now();
        let detail = self.store().commit(|t| {
            let current = t.staff.get(&id).ok_or(OpError::NotFound)?;
            let mut next = current.with_patch(patch);
            next.validate()?;
            integrity::check_staff_refs(t, &next)?;
            t.staff_employee_id_unique(&next.employee_id, Some(id))?;
            t.staff_email_unique(&next.email, Some(id))?;
            next.updated_at = now;
            t.staff.insert(id, next.clone());
            attach_relations(t, next)
        })?;
        debug!(staff_id = %id, "staff updated");
        Ok(detail)
    }

    pub fn delete_staff(&self, id: StaffId) -> OpResult<()> {
        self.store().commit(|t| {
            t.staff.remove(&id).ok_or(OpError::NotFound)?;
            Ok(())
        })?;
        debug!(staff_id = %id, "staff deleted");
        Ok(())
    }
}
