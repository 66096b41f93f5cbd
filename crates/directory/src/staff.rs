use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::patch;
use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::{CompanyId, DepartmentId, RoleId, StaffId, UserId};

/// Staff employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    Active,
    Inactive,
    Terminated,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Terminated => "terminated",
        }
    }
}

impl core::fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff member: belongs to a company and one of its departments, holds a
/// role, and may be linked to a login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub user_id: Option<UserId>,
    pub company_id: CompanyId,
    pub department_id: DepartmentId,
    pub role_id: RoleId,
    /// Globally unique employee number.
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Globally unique work email.
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: NaiveDate,
    /// When present, never earlier than `hire_date`.
    pub termination_date: Option<NaiveDate>,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStaff {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub company_id: CompanyId,
    pub department_id: DepartmentId,
    pub role_id: RoleId,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
}

/// Partial update: absent fields keep their current value. The optional row
/// fields (account link, phone, termination date) are doubly wrapped so an
/// explicit null clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaffPatch {
    #[serde(default, deserialize_with = "patch::clearable")]
    pub user_id: Option<Option<UserId>>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub termination_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
}

impl Staff {
    pub fn create(id: StaffId, fields: NewStaff, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: fields.user_id,
            company_id: fields.company_id,
            department_id: fields.department_id,
            role_id: fields.role_id,
            employee_id: fields.employee_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            hire_date: fields.hire_date,
            termination_date: fields.termination_date,
            status: fields.status.unwrap_or(StaffStatus::Active),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_patch(&self, patch: &StaffPatch) -> Self {
        let mut next = self.clone();
        if let Some(user_id) = patch.user_id {
            next.user_id = user_id;
        }
        if let Some(company_id) = patch.company_id {
            next.company_id = company_id;
        }
        if let Some(department_id) = patch.department_id {
            next.department_id = department_id;
        }
        if let Some(role_id) = patch.role_id {
            next.role_id = role_id;
        }
        if let Some(employee_id) = &patch.employee_id {
            next.employee_id = employee_id.clone();
        }
        if let Some(first_name) = &patch.first_name {
            next.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            next.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            next.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            next.phone = phone.clone();
        }
        if let Some(hire_date) = patch.hire_date {
            next.hire_date = hire_date;
        }
        if let Some(termination_date) = patch.termination_date {
            next.termination_date = termination_date;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        next
    }

    /// Computed, never stored.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "employee_id",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "first_name",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "last_name",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "email",
        rules: &[Rule::Required, Rule::Email, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "phone",
        rules: &[Rule::MaxLen(255)],
    },
    FieldRule {
        field: "termination_date",
        rules: &[Rule::OnOrAfter("hire_date")],
    },
];

impl Validate for Staff {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("employee_id", FieldValue::Text(&self.employee_id)),
            ("first_name", FieldValue::Text(&self.first_name)),
            ("last_name", FieldValue::Text(&self.last_name)),
            ("email", FieldValue::Text(&self.email)),
            (
                "phone",
                self.phone.as_deref().map_or(FieldValue::Absent, FieldValue::Text),
            ),
            ("hire_date", FieldValue::Date(self.hire_date)),
            (
                "termination_date",
                self.termination_date.map_or(FieldValue::Absent, FieldValue::Date),
            ),
        ]
    }
}
