use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::patch;
use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::RoleId;

/// A role grantable to staff and user accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    /// Globally unique short code.
    pub code: String,
    pub description: Option<String>,
    /// Ordered permission strings; order is caller-significant and preserved.
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRole {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Partial update: absent fields keep their current value; a null
/// description clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RolePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Role {
    pub fn create(id: RoleId, fields: NewRole, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            code: fields.code,
            description: fields.description,
            permissions: fields.permissions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_patch(&self, patch: &RolePatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(code) = &patch.code {
            next.code = code.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(permissions) = &patch.permissions {
            next.permissions = permissions.clone();
        }
        next
    }

    /// Whether the role grants a permission (exact match or wildcard).
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == "*" || p == permission)
    }
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "code",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
];

impl Validate for Role {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", FieldValue::Text(&self.name)),
            ("code", FieldValue::Text(&self.code)),
        ]
    }
}
