//! Entity kinds known to the store and the integrity policy graph.

use serde::{Deserialize, Serialize};

/// The kinds of row the store manages.
///
/// Ordered so kinds can key sorted collections (delete plans collect
/// `(kind, id)` pairs into ordered sets).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Department,
    Role,
    Staff,
    Post,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Department => "department",
            Self::Role => "role",
            Self::Staff => "staff",
            Self::Post => "post",
            Self::User => "user",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
