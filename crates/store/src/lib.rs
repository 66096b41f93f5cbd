//! `orgdir-store` — transactional entity store, integrity coordinator, query
//! surface, and the operation services built on top of them.
//!
//! Layering, leaf-first:
//! - [`engine`]: snapshot tables behind a single-writer lock; commits are
//!   all-or-nothing and the store is the final arbiter of uniqueness.
//! - [`integrity`]: the foreign-key policy graph (cascade / restrict /
//!   nullify) and the transactional delete planner.
//! - [`query`]: allow-listed sorting, equality filters, pagination.
//! - [`ops`]: the five operations per entity kind, wired through
//!   gate → validation → integrity → commit.

pub mod engine;
pub mod integrity;
pub mod ops;
pub mod query;


pub use engine::{MemoryStore, Tables};
pub use integrity::{DeletePlan, DeletePolicy, FkEdge, POLICY};
pub use ops::Directory;
pub use query::{ListParams, Page, PageRequest, SortDirection, SortSpec};
