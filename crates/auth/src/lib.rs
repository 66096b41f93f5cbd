//! `orgdir-auth` — acting-identity boundary.
//!
//! This crate is intentionally decoupled from transport and storage: it holds
//! the acting identity carried into each operation, the user account record
//! (the one external collaborator the integrity graph references), and the
//! pure ownership policy check.

pub mod actor;
pub mod ownership;
pub mod user;

pub use actor::Actor;
pub use ownership::ensure_owner;
pub use user::{NewUser, User};
