//! Operation outcome model.
//!
//! Every failure an entity operation can produce is a modeled outcome here.
//! Keep this focused on deterministic, business-level failures; the engine has
//! no infrastructure errors to surface beyond a poisoned lock, which maps to
//! a conflict the caller may retry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::EntityKind;

/// Result type used across the operation surface.
pub type OpResult<T> = Result<T, OpError>;

/// Field-scoped validation violations, collected rather than short-circuited.
///
/// Keyed by field name; each field carries every message raised against it so
/// callers can render all problems at once. `BTreeMap` keeps the rendering
/// order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violations(BTreeMap<String, Vec<String>>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Absorb another set of violations.
    pub fn merge(&mut self, other: Violations) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty, otherwise the collected violations as an error.
    pub fn into_result(self) -> OpResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OpError::Validation(self))
        }
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Operation-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpError {
    /// One or more fields failed validation. Never partially applied.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// A supplied foreign key does not resolve to an existing row.
    #[error("dangling reference: {field}")]
    DanglingReference { field: &'static str },

    /// A uniqueness constraint was violated at commit time.
    #[error("constraint violation: {field}")]
    ConstraintViolation { field: &'static str },

    /// A delete was blocked by dependents under a restrict policy.
    #[error("restricted deletion: {count} dependent {kind} row(s)")]
    RestrictedDeletion { kind: EntityKind, count: usize },

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// The acting identity is not permitted to mutate this resource.
    #[error("forbidden")]
    Forbidden,

    /// The store could not serialize the operation; safe to retry.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl OpError {
    /// A single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut v = Violations::new();
        v.push(field, message);
        Self::Validation(v)
    }

    pub fn dangling(field: &'static str) -> Self {
        Self::DanglingReference { field }
    }

    pub fn duplicate(field: &'static str) -> Self {
        Self::ConstraintViolation { field }
    }

    pub fn restricted(kind: EntityKind, count: usize) -> Self {
        Self::RestrictedDeletion { kind, count }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_collect_per_field() {
        let mut v = Violations::new();
        v.push("email", "must be a valid email address");
        v.push("email", "must be at most 255 characters");
        v.push("name", "is required");

        assert_eq!(v.len(), 2);
        assert_eq!(v.messages("email").len(), 2);
        assert_eq!(v.messages("name"), ["is required"]);
        assert!(v.messages("phone").is_empty());
    }

    #[test]
    fn empty_violations_are_ok() {
        assert!(Violations::new().into_result().is_ok());
    }

    #[test]
    fn merge_keeps_messages_from_both_sides() {
        let mut a = Violations::new();
        a.push("code", "is required");
        let mut b = Violations::new();
        b.push("code", "must be at most 255 characters");
        b.push("name", "is required");

        a.merge(b);
        assert_eq!(a.messages("code").len(), 2);
        assert_eq!(a.messages("name").len(), 1);
    }

    #[test]
    fn restricted_deletion_names_the_dependent() {
        let err = OpError::restricted(EntityKind::Staff, 3);
        assert_eq!(err.to_string(), "restricted deletion: 3 dependent staff row(s)");
    }
}
