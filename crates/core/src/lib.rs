//! `orgdir-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod error;
pub mod id;
pub mod kind;
pub mod patch;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{OpError, OpResult, Violations};
pub use id::{CompanyId, DepartmentId, PostId, RoleId, StaffId, UserId};
pub use kind::EntityKind;
pub use validate::{FieldRule, FieldValue, Rule, Validate};
