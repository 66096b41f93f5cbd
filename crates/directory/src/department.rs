use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::patch;
use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::{CompanyId, DepartmentId};

/// A department within a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub company_id: CompanyId,
    pub name: String,
    /// Globally unique short code.
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDepartment {
    pub company_id: CompanyId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update: absent fields keep their current value; a null
/// description clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentPatch {
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Department {
    pub fn create(id: DepartmentId, fields: NewDepartment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            company_id: fields.company_id,
            name: fields.name,
            code: fields.code,
            description: fields.description,
            is_active: fields.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_patch(&self, patch: &DepartmentPatch) -> Self {
        let mut next = self.clone();
        if let Some(company_id) = patch.company_id {
            next.company_id = company_id;
        }
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(code) = &patch.code {
            next.code = code.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        next
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

impl Validate for Department {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", FieldValue::Text(&self.name)),
            ("code", FieldValue::Text(&self.code)),
            (
                "description",
                self.description
                    .as_deref()
                    .map_or(FieldValue::Absent, FieldValue::Text),
            ),
        ]
    }
}
