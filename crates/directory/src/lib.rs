//! Directory domain module: companies, departments, roles, staff.
//!
//! This crate contains the organizational entities as pure domain types
//! (no IO, no storage): row structs, create payloads, partial-update patches,
//! and the declarative validation rule table for each entity.

pub mod company;
pub mod department;
pub mod role;
pub mod staff;

pub use company::{Company, CompanyPatch, NewCompany};
pub use department::{Department, DepartmentPatch, NewDepartment};
pub use role::{NewRole, Role, RolePatch};
pub use staff::{NewStaff, Staff, StaffPatch, StaffStatus};
