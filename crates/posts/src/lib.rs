//! Posts domain module: an ownership-scoped content resource.
//!
//! Posts sit outside the organizational hierarchy; the only relationship they
//! carry is the owning user, recorded at creation and immutable afterwards.

pub mod post;

pub use post::{NewPost, Post, PostPatch, PostStatus};
