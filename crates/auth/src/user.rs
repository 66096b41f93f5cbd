//! User account record.
//!
//! Accounts are mostly an external collaborator's concern; they live here
//! because the integrity graph references them (Role → User restrict,
//! User → Staff nullify) and Posts record their owner. Credential material is
//! an opaque, already-hashed string; hashing and login flows are out of scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::{RoleId, UserId};

/// A login account holding a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Opaque credential hash; never validated or rendered.
    pub password_hash: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when registering an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: RoleId,
}

impl User {
    pub fn create(id: UserId, fields: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            role_id: fields.role_id,
            created_at: now,
            updated_at: now,
        }
    }
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "email",
        rules: &[Rule::Required, Rule::Email, Rule::MaxLen(255)],
    },
];

impl Validate for User {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", FieldValue::Text(&self.name)),
            ("email", FieldValue::Text(&self.email)),
        ]
    }
}
