use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::patch;
use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::CompanyId;

/// A company: the root of the organizational hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Globally unique short code.
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCompany {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Defaults to active when not supplied.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update: absent fields keep their current value. Optional row
/// fields are doubly wrapped so an explicit null clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Company {
    pub fn create(id: CompanyId, fields: NewCompany, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            code: fields.code,
            address: fields.address,
            phone: fields.phone,
            email: fields.email,
            is_active: fields.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Candidate row after applying a patch; `updated_at` is stamped by the
    /// store on commit.
    pub fn with_patch(&self, patch: &CompanyPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(code) = &patch.code {
            next.code = code.clone();
        }
        if let Some(address) = &patch.address {
            next.address = address.clone();
        }
        if let Some(phone) = &patch.phone {
            next.phone = phone.clone();
        }
        if let Some(email) = &patch.email {
            next.email = email.clone();
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
    FieldRule {
        field: "phone",
        rules: &[Rule::MaxLen(255)],
    },
    FieldRule {
        field: "email",
        rules: &[Rule::Email, Rule::MaxLen(255)],
    },
];

impl Validate for Company {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", FieldValue::Text(&self.name)),
            ("code", FieldValue::Text(&self.code)),
            (
                "address",
                self.address.as_deref().map_or(FieldValue::Absent, FieldValue::Text),
            ),
            (
                "phone",
                self.phone.as_deref().map_or(FieldValue::Absent, FieldValue::Text),
            ),
            (
                "email",
                self.email.as_deref().map_or(FieldValue::Absent, FieldValue::Text),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdir_core::OpError;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn new_company() -> NewCompany {
        NewCompany {
            name: "Acme Corp".to_string(),
            code: "ACME".to_string(),
            address: None,
            phone: None,
            email: None,
            is_active: None,
        }
    }

    #[test]
    fn create_defaults_to_active() {
        let company = Company::create(CompanyId::new(), new_company(), now());
        assert!(company.is_active);
        assert!(company.validate().is_ok());
    }

    #[test]
    fn optional_fields_are_not_required() {
        let company = Company::create(CompanyId::new(), new_company(), now());
        assert!(company.address.is_none());
        assert!(company.validate().is_ok());
    }

    #[test]
    fn invalid_email_is_field_scoped() {
        let mut fields = new_company();
        fields.email = Some("nope".to_string());
        let company = Company::create(CompanyId::new(), fields, now());

        let OpError::Validation(v) = company.validate().unwrap_err() else {
            panic!("expected Validation");
        };
        assert_eq!(v.messages("email"), ["must be a valid email address"]);
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let company = Company::create(CompanyId::new(), new_company(), now());
        let patched = company.with_patch(&CompanyPatch {
            phone: Some(Some("555-0100".to_string())),
            ..CompanyPatch::default()
        });

        assert_eq!(patched.name, company.name);
        assert_eq!(patched.code, company.code);
        assert_eq!(patched.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn patch_null_clears_optional_fields() {
        let mut fields = new_company();
        fields.phone = Some("555-0100".to_string());
        let company = Company::create(CompanyId::new(), fields, now());

        let patch: CompanyPatch = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        assert_eq!(patch.phone, Some(None));

        let patched = company.with_patch(&patch);
        assert_eq!(patched.phone, None);
        assert_eq!(patched.name, company.name);
    }

    #[test]
    fn unknown_payload_fields_are_rejected() {
        let err = serde_json::from_str::<NewCompany>(
            r#"{"name":"Acme","code":"ACME","ceo":"nobody"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ceo"));
    }
}
