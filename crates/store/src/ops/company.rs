use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use orgdir_core::validate::Validate;
use orgdir_core::{CompanyId, EntityKind, OpError, OpResult};
use orgdir_directory::{Company, CompanyPatch, Department, NewCompany, Staff};

use crate::integrity;
use crate::query::{self, ListParams, Page};

use super::Directory;

/// Company with the relations its show operation attaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub company: Company,
    pub departments: Vec<Department>,
    pub staff: Vec<Staff>,
}

/// Company as it appears in listings (departments attached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyListItem {
    pub company: Company,
    pub departments: Vec<Department>,
}

impl Directory {
    pub fn list_companies(&self, params: &ListParams) -> OpResult<Page<CompanyListItem>> {
        self.store().read(|t| {
            query::run(t.companies.values(), params).map(|company| CompanyListItem {
                departments: t
                    .departments
                    .values()
                    .filter(|d| d.company_id == company.id)
                    .cloned()
                    .collect(),
                company,
            })
        })
    }

    pub fn create_company(&self, fields: NewCompany) -> OpResult<Company> {
        let company = Company::create(CompanyId::new(), fields, self.now());
        company.validate()?;

        let created = self.store().commit(|t| {
            t.company_code_unique(&company.code, None)?;
            t.companies.insert(company.id, company.clone());
            Ok(company.clone())
        })?;
        debug!(company_id = %created.id, code = %created.code, "company created");
        Ok(created)
    }

    pub fn get_company(&self, id: CompanyId) -> OpResult<CompanyDetail> {
        self.store().read(|t| {
            let company = t.companies.get(&id).cloned().ok_or(OpError::NotFound)?;
            Ok(CompanyDetail {
                departments: t
                    .departments
                    .values()
                    .filter(|d| d.company_id == id)
                    .cloned()
                    .collect(),
                staff: t
                    .staff
                    .values()
                    .filter(|s| s.company_id == id)
                    .cloned()
                    .collect(),
                company,
            })
        })?
    }

    pub fn update_company(&self, id: CompanyId, patch: &CompanyPatch) -> OpResult<Company> {
        let now = self.now();
        let updated = self.store().commit(|t| {
            let current = t.companies.get(&id).ok_or(OpError::NotFound)?;
            let mut next = current.with_patch(patch);
            next.validate()?;
            t.company_code_unique(&next.code, Some(id))?;
            next.updated_at = now;
            t.companies.insert(id, next.clone());
            Ok(next)
        })?;
        debug!(company_id = %id, "company updated");
        Ok(updated)
    }

    /// Delete a company and, in the same transaction, every department and
    /// staff row under it.
    pub fn delete_company(&self, id: CompanyId) -> OpResult<()> {
        let plan = self.store().commit(|t| {
            if !t.companies.contains_key(&id) {
                return Err(OpError::NotFound);
            }
            let plan = integrity::plan_delete(t, EntityKind::Company, *id.as_uuid())?;
            integrity::apply_plan(t, &plan);
            Ok(plan)
        })?;
        info!(
            company_id = %id,
            cascaded = plan.deletes.len() - 1,
            "company deleted"
        );
        Ok(())
    }
}
