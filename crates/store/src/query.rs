//! Query surface: filtering, sorting, pagination over listing endpoints.
//!
//! Listing inputs arrive as loosely-typed strings (sort field, direction,
//! filter keys) so that listing endpoints stay resilient to malformed input:
//! an unrecognized sort field falls back to the primary id ascending, an
//! unrecognized direction to ascending, and unsupported filter keys are
//! ignored. Mutation payloads, by contrast, reject unknown fields outright.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use orgdir_auth::User;
use orgdir_directory::{Company, Department, Role, Staff};
use orgdir_posts::Post;

/// Default page size, matching the original listing endpoints.
pub const DEFAULT_PER_PAGE: u32 = 15;
/// Upper bound on caller-specified page sizes.
pub const MAX_PER_PAGE: u32 = 200;

/// Sort direction, ascending unless the caller clearly asks otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse with the safe fallback: anything that is not a descending
    /// spelling sorts ascending.
    pub fn parse(s: &str) -> Self {
        match s {
            "desc" | "descending" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// Caller-supplied sort request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Caller-supplied page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Full listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Equality filters; unsupported keys are ignored.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub page: PageRequest,
}

impl ListParams {
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn sorted(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = PageRequest::new(Some(page), Some(per_page));
        self
    }
}

/// One page of results with the counts computed from the filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    /// Filtered (pre-pagination) row count.
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Reshape items while keeping the page geometry, e.g. to attach eager
    /// relations.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Entities that can be listed through the query surface.
///
/// `compare_field` and `filter_field` encode the per-entity allow-lists: both
/// return `None` for keys outside the list, which the pipeline treats as
/// "fall back" and "ignore" respectively.
pub trait Listable {
    /// Compare on an allow-listed sort field; `None` for unknown fields.
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering>;

    /// Primary-key ordering, the safe fallback and final tie-break.
    fn compare_id(&self, other: &Self) -> Ordering;

    /// Evaluate an allow-listed equality filter; `None` for unknown keys.
    fn filter_field(&self, key: &str, value: &str) -> Option<bool>;

    /// Ordering applied when the caller does not sort.
    fn default_order(&self, other: &Self) -> Ordering {
        self.compare_id(other)
    }
}

/// Run the filter → sort → paginate pipeline over a snapshot's rows.
pub fn run<'a, T>(rows: impl Iterator<Item = &'a T>, params: &ListParams) -> Page<T>
where
    T: Listable + Clone + 'a,
{
    let mut matched: Vec<&T> = rows
        .filter(|row| {
            params
                .filters
                .iter()
                .all(|(key, value)| row.filter_field(key, value).unwrap_or(true))
        })
        .collect();

    match &params.sort {
        Some(spec) => {
            matched.sort_by(|a, b| match a.compare_field(b, &spec.field) {
                Some(ord) => {
                    let ord = match spec.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    };
                    ord.then_with(|| a.compare_id(b))
                }
                // Unknown field: primary id ascending, direction ignored.
                None => a.compare_id(b),
            });
        }
        None => matched.sort_by(|a, b| a.default_order(b)),
    }

    // `PageRequest::new` clamps, but the fields are public and the type
    // deserializes raw, so re-clamp here: page 0 is page 1, per_page stays
    // within bounds.
    let page = params.page.page.max(1);
    let per_page = params.page.per_page.clamp(1, MAX_PER_PAGE);

    let total = matched.len() as u64;
    let total_pages = (total.div_ceil(per_page as u64) as u32).max(1);
    let offset = (page as usize - 1).saturating_mul(per_page as usize);

    let items = matched
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .cloned()
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

impl Listable for Company {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "name" => Some(self.name.cmp(&other.name)),
            "code" => Some(self.code.cmp(&other.code)),
            "email" => Some(self.email.cmp(&other.email)),
            "phone" => Some(self.phone.cmp(&other.phone)),
            "is_active" => Some(self.is_active.cmp(&other.is_active)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, _key: &str, _value: &str) -> Option<bool> {
        None
    }
}

impl Listable for Department {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "name" => Some(self.name.cmp(&other.name)),
            "code" => Some(self.code.cmp(&other.code)),
            "is_active" => Some(self.is_active.cmp(&other.is_active)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, key: &str, value: &str) -> Option<bool> {
        match key {
            "company_id" => Some(self.company_id.to_string() == value),
            _ => None,
        }
    }
}

impl Listable for Role {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "name" => Some(self.name.cmp(&other.name)),
            "code" => Some(self.code.cmp(&other.code)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, _key: &str, _value: &str) -> Option<bool> {
        None
    }
}

impl Listable for Staff {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "employee_id" => Some(self.employee_id.cmp(&other.employee_id)),
            "first_name" => Some(self.first_name.cmp(&other.first_name)),
            "last_name" => Some(self.last_name.cmp(&other.last_name)),
            "email" => Some(self.email.cmp(&other.email)),
            "status" => Some(self.status.as_str().cmp(other.status.as_str())),
            "hire_date" => Some(self.hire_date.cmp(&other.hire_date)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, key: &str, value: &str) -> Option<bool> {
        match key {
            "company_id" => Some(self.company_id.to_string() == value),
            "department_id" => Some(self.department_id.to_string() == value),
            "status" => Some(self.status.as_str() == value),
            _ => None,
        }
    }
}

impl Listable for Post {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "title" => Some(self.title.cmp(&other.title)),
            "status" => Some(self.status.as_str().cmp(other.status.as_str())),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, _key: &str, _value: &str) -> Option<bool> {
        None
    }

    /// Posts list newest-first by default.
    fn default_order(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl Listable for User {
    fn compare_field(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.compare_id(other)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.cmp(&other.email)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }

    fn compare_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    fn filter_field(&self, _key: &str, _value: &str) -> Option<bool> {
        None
    }
}
