use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use orgdir_core::validate::Validate;
use orgdir_core::{DepartmentId, EntityKind, OpError, OpResult};
use orgdir_directory::{Company, Department, DepartmentPatch, NewDepartment, Staff};

use crate::engine::Tables;
use crate::integrity;
use crate::query::{self, ListParams, Page};

use super::Directory;

/// Department with the relations its show operation attaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDetail {
    pub department: Department,
    pub company: Company,
    pub staff: Vec<Staff>,
}

/// Department as it appears in listings (owning company attached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentListItem {
    pub department: Department,
    pub company: Company,
}

fn resolve_company(t: &Tables, department: &Department) -> OpResult<Company> {
    t.companies
        .get(&department.company_id)
        .cloned()
        .ok_or(OpError::dangling("company_id"))
}

impl Directory {
    pub fn list_departments(&self, params: &ListParams) -> OpResult<Page<DepartmentListItem>> {
        self.store().read(|t| {
            let page = query::run(t.departments.values(), params);
            let mut items = Vec::with_capacity(page.items.len());
            for department in &page.items {
                items.push(DepartmentListItem {
                    company: resolve_company(t, department)?,
                    department: department.clone(),
                });
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

    pub fn create_department(&self, fields: NewDepartment) -> OpResult<Department> {
        let department = Department::create(DepartmentId::new(), fields, self.now());
        department.validate()?;

        let created = self.store().commit(|t| {
            if !t.companies.contains_key(&department.company_id) {
                return Err(OpError::dangling("company_id"));
            }
            t.department_code_unique(&department.code, None)?;
            t.departments.insert(department.id, department.clone());
            Ok(department.clone())
        })?;
        debug!(department_id = %created.id, code = %created.code, "department created");
        Ok(created)
    }

    pub fn get_department(&self, id: DepartmentId) -> OpResult<DepartmentDetail> {
        self.store().read(|t| {
            let department = t.departments.get(&id).cloned().ok_or(OpError::NotFound)?;
            Ok(DepartmentDetail {
                company: resolve_company(t, &department)?,
                staff: t
                    .staff
                    .values()
                    .filter(|s| s.department_id == id)
                    .cloned()
                    .collect(),
                department,
            })
        })?
    }

    pub fn update_department(
        &self,
        id: DepartmentId,
        patch: &DepartmentPatch,
    ) -> OpResult<Department> {
        let now = self.now();
        let updated = self.store().commit(|t| {
            let current = t.departments.get(&id).ok_or(OpError::NotFound)?;
            let mut next = current.with_patch(patch);
            next.validate()?;
            if !t.companies.contains_key(&next.company_id) {
                return Err(OpError::dangling("company_id"));
            }
            t.department_code_unique(&next.code, Some(id))?;
            next.updated_at = now;
            t.departments.insert(id, next.clone());
            Ok(next)
        })?;
        debug!(department_id = %id, "department updated");
        Ok(updated)
    }

    /// Delete a department and, in the same transaction, its staff.
    pub fn delete_department(&self, id: DepartmentId) -> OpResult<()> {
        let plan = self.store().commit(|t| {
            if !t.departments.contains_key(&id) {
                return Err(OpError::NotFound);
            }
            let plan = integrity::plan_delete(t, EntityKind::Department, *id.as_uuid())?;
            integrity::apply_plan(t, &plan);
            Ok(plan)
        })?;
        info!(
            department_id = %id,
            cascaded = plan.deletes.len() - 1,
            "department deleted"
        );
        Ok(())
    }
}
