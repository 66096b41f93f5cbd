//! Table-driven validation engine.
//!
//! Each entity declares a static rule table (`&[FieldRule]`) and exposes its
//! candidate row as a flat field-value view. `validate` walks the table over
//! the view and collects every violation; it never mutates anything and never
//! stops at the first failure.
//!
//! Partial updates are handled upstream by merging the patch into the current
//! row, so the view always describes a complete candidate row and the same
//! table applies to creates and updates alike.

use chrono::NaiveDate;

use crate::error::{OpResult, Violations};

/// A single declarative rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present and, for text, non-empty.
    Required,
    /// Text length ceiling, in characters.
    MaxLen(usize),
    /// The field must be a syntactically plausible email address.
    Email,
    /// The field's date must not be earlier than the named field's date.
    /// Skipped when either side is absent.
    OnOrAfter(&'static str),
}

/// Rules attached to one named field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// A field's value as seen by the rule engine.
///
/// Fields whose shape is already enforced by the type system (ids, booleans,
/// enums) do not appear in rule tables and need no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Optional field not set on the candidate row.
    Absent,
    Text(&'a str),
    Date(NaiveDate),
}

/// Entities that can be validated against a static rule table.
pub trait Validate {
    fn rules() -> &'static [FieldRule];

    /// Flat view of the candidate row, one entry per rule-bearing field.
    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)>;

    fn validate(&self) -> OpResult<()> {
        let values = self.field_values();
        validate(Self::rules(), &values)
    }
}

/// Apply a rule table to a field-value view, collecting all violations.
pub fn validate(rules: &[FieldRule], values: &[(&'static str, FieldValue<'_>)]) -> OpResult<()> {
    let mut violations = Violations::new();

    let lookup = |field: &str| {
        values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
            .unwrap_or(FieldValue::Absent)
    };

    for entry in rules {
        let value = lookup(entry.field);
        for rule in entry.rules {
            match (rule, value) {
                (Rule::Required, FieldValue::Absent) => {
                    violations.push(entry.field, "is required");
                }
                (Rule::Required, FieldValue::Text(s)) if s.is_empty() => {
                    violations.push(entry.field, "is required");
                }
                (Rule::Required, _) => {}

                (Rule::MaxLen(max), FieldValue::Text(s)) => {
                    if s.chars().count() > *max {
                        violations.push(entry.field, format!("must be at most {max} characters"));
                    }
                }
                (Rule::MaxLen(_), _) => {}

                (Rule::Email, FieldValue::Text(s)) => {
                    if !s.is_empty() && !is_plausible_email(s) {
                        violations.push(entry.field, "must be a valid email address");
                    }
                }
                (Rule::Email, _) => {}

                (Rule::OnOrAfter(other), FieldValue::Date(date)) => {
                    if let FieldValue::Date(bound) = lookup(other) {
                        if date < bound {
                            violations
                                .push(entry.field, format!("must not be earlier than {other}"));
                        }
                    }
                }
                (Rule::OnOrAfter(_), _) => {}
            }
        }
    }

    violations.into_result()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain with
/// no whitespace. Deliverability is not this layer's concern.
fn is_plausible_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[FieldRule] = &[
        FieldRule {
            field: "name",
            rules: &[Rule::Required, Rule::MaxLen(255)],
        },
        FieldRule {
            field: "email",
            rules: &[Rule::Required, Rule::Email, Rule::MaxLen(255)],
        },
        FieldRule {
            field: "termination_date",
            rules: &[Rule::OnOrAfter("hire_date")],
        },
    ];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn collects_all_violations_in_one_pass() {
        let long = "x".repeat(300);
        let values = vec![
            ("name", FieldValue::Text(long.as_str())),
            ("email", FieldValue::Text("not-an-email")),
        ];

        let crate::error::OpError::Validation(v) = validate(RULES, &values).unwrap_err() else {
            panic!("expected Validation");
        };
        assert_eq!(v.messages("name"), ["must be at most 255 characters"]);
        assert_eq!(v.messages("email"), ["must be a valid email address"]);
    }

    #[test]
    fn required_rejects_absent_and_empty() {
        let values = vec![("name", FieldValue::Text("")), ("email", FieldValue::Absent)];
        let crate::error::OpError::Validation(v) = validate(RULES, &values).unwrap_err() else {
            panic!("expected Validation");
        };
        assert_eq!(v.messages("name"), ["is required"]);
        assert_eq!(v.messages("email"), ["is required"]);
    }

    #[test]
    fn date_order_allows_equal_dates() {
        let values = vec![
            ("name", FieldValue::Text("Ada")),
            ("email", FieldValue::Text("ada@example.com")),
            ("hire_date", FieldValue::Date(date(2024, 1, 10))),
            ("termination_date", FieldValue::Date(date(2024, 1, 10))),
        ];
        assert!(validate(RULES, &values).is_ok());
    }

    #[test]
    fn date_order_rejects_earlier_termination() {
        let values = vec![
            ("name", FieldValue::Text("Ada")),
            ("email", FieldValue::Text("ada@example.com")),
            ("hire_date", FieldValue::Date(date(2024, 1, 10))),
            ("termination_date", FieldValue::Date(date(2024, 1, 5))),
        ];
        let crate::error::OpError::Validation(v) = validate(RULES, &values).unwrap_err() else {
            panic!("expected Validation");
        };
        assert_eq!(
            v.messages("termination_date"),
            ["must not be earlier than hire_date"]
        );
    }

    #[test]
    fn date_order_skipped_when_absent() {
        let values = vec![
            ("name", FieldValue::Text("Ada")),
            ("email", FieldValue::Text("ada@example.com")),
            ("hire_date", FieldValue::Date(date(2024, 1, 10))),
        ];
        assert!(validate(RULES, &values).is_ok());
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "first.last@sub.example.com", "x+y@example.org"] {
            assert!(is_plausible_email(good), "{good} should pass");
        }
        for bad in ["", "plain", "@example.com", "a@b", "a b@example.com", "a@@example.com"] {
            assert!(!is_plausible_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn max_len_counts_characters_not_bytes() {
        let s = "é".repeat(255);
        let values = vec![
            ("name", FieldValue::Text(s.as_str())),
            ("email", FieldValue::Text("a@b.co")),
        ];
        assert!(validate(RULES, &values).is_ok());
    }
}
