use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgdir_core::validate::{FieldRule, FieldValue, Rule, Validate};
use orgdir_core::{PostId, UserId};

/// Post publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl core::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post authored by a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    /// Recorded at creation; immutable. `PostPatch` has no owner field, so
    /// ownership cannot change through the update pipeline.
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a post. The owner comes from the acting
/// identity, never from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: Option<PostStatus>,
}

/// Partial update: absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
}

impl Post {
    pub fn create(id: PostId, owner: UserId, fields: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            content: fields.content,
            status: fields.status.unwrap_or(PostStatus::Draft),
            owner_user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_patch(&self, patch: &PostPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(content) = &patch.content {
            next.content = content.clone();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        next
    }
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "title",
        rules: &[Rule::Required, Rule::MaxLen(255)],
    },
    FieldRule {
        field: "content",
        rules: &[Rule::Required],
    },
];

impl Validate for Post {
    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn field_values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("title", FieldValue::Text(&self.title)),
            ("content", FieldValue::Text(&self.content)),
        ]
    }
}
