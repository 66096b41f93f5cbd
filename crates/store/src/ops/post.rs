use serde::{Deserialize, Serialize};
use tracing::debug;

use orgdir_auth::{ensure_owner, Actor, User};
use orgdir_core::validate::Validate;
use orgdir_core::{OpError, OpResult, PostId};
use orgdir_posts::{NewPost, Post, PostPatch};

use crate::query::{self, ListParams, Page};

use super::Directory;

/// Post with its owning user attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub user: Option<User>,
}

impl Directory {
    /// Listing is not owner-restricted; newest posts come first by default.
    pub fn list_posts(&self, params: &ListParams) -> OpResult<Page<PostDetail>> {
        self.store().read(|t| {
            query::run(t.posts.values(), params).map(|post| PostDetail {
                user: t.users.get(&post.owner_user_id).cloned(),
                post,
            })
        })
    }

    /// Create a post owned by the actor. The payload carries no owner field.
    pub fn create_post(&self, actor: &Actor, fields: NewPost) -> OpResult<PostDetail> {
        let post = Post::create(PostId::new(), actor.user_id, fields, self.now());
        post.validate()?;

        let detail = self.store().commit(|t| {
            if !t.users.contains_key(&post.owner_user_id) {
                return Err(OpError::dangling("owner_user_id"));
            }
            t.posts.insert(post.id, post.clone());
            Ok(PostDetail {
                user: t.users.get(&post.owner_user_id).cloned(),
                post,
            })
        })?;
        debug!(post_id = %detail.post.id, "post created");
        Ok(detail)
    }

    /// Reads are not owner-restricted.
    pub fn get_post(&self, id: PostId) -> OpResult<PostDetail> {
        self.store().read(|t| {
            let post = t.posts.get(&id).cloned().ok_or(OpError::NotFound)?;
            Ok(PostDetail {
                user: t.users.get(&post.owner_user_id).cloned(),
                post,
            })
        })?
    }

    /// Update a post. The ownership gate runs strictly before validation, so
    /// a non-owner learns nothing about their payload's validity.
    pub fn update_post(&self, actor: &Actor, id: PostId, patch: &PostPatch) -> OpResult<PostDetail> {
        let now = self.now();
        let detail = self.store().commit(|t| {
            let current = t.posts.get(&id).ok_or(OpError::NotFound)?;
            ensure_owner(actor, current.owner_user_id)?;

            let mut next = current.with_patch(patch);
            next.validate()?;
            next.updated_at = now;
            t.posts.insert(id, next.clone());
            Ok(PostDetail {
                user: t.users.get(&next.owner_user_id).cloned(),
                post: next,
            })
        })?;
        debug!(post_id = %id, "post updated");
        Ok(detail)
    }

    pub fn delete_post(&self, actor: &Actor, id: PostId) -> OpResult<()> {
        self.store().commit(|t| {
            let current = t.posts.get(&id).ok_or(OpError::NotFound)?;
            ensure_owner(actor, current.owner_user_id)?;
            t.posts.remove(&id);
            Ok(())
        })?;
        debug!(post_id = %id, "post deleted");
        Ok(())
    }
}
