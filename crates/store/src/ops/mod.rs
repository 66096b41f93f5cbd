//! Operation services: the external surface of the core.
//!
//! One `Directory` service exposes, per entity kind, the five operations
//! list / create / get / update / delete. Every mutation runs the same
//! pipeline inside a single store transaction: ownership gate (Posts only),
//! then validation, then integrity checks, then commit.

mod company;
mod department;
mod post;
mod role;
mod staff;
mod user;

use std::sync::Arc;

use orgdir_core::{Clock, SystemClock};

use crate::engine::MemoryStore;

pub use company::{CompanyDetail, CompanyListItem};
pub use department::{DepartmentDetail, DepartmentListItem};
pub use post::PostDetail;
pub use role::{RoleDetail, RoleSummary};
pub use staff::StaffDetail;

/// The directory service: owns the store and the clock.
#[derive(Clone)]
pub struct Directory {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
}

impl Directory {
    pub fn new(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Fresh empty directory on the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub(crate) fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
