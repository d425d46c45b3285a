//! Comment creation with referential validation
//!
//! A comment is written only after the posts service confirmed, at that
//! moment, that the referenced post exists. Nothing holds the reference
//! afterwards.

use crate::comments::posts_client::PostLookup;
use crate::comments::store::CommentStore;
use crate::common::config::UnreachablePolicy;
use crate::common::{Comment, Error, NewComment, Result};
use std::sync::Arc;

pub struct CommentService {
    store: CommentStore,
    posts: Arc<dyn PostLookup>,
    unreachable: UnreachablePolicy,
}

impl CommentService {
    pub fn new(store: CommentStore, posts: Arc<dyn PostLookup>, unreachable: UnreachablePolicy) -> Self {
        Self {
            store,
            posts,
            unreachable,
        }
    }

    pub async fn create(&self, req: NewComment) -> Result<Comment> {
        let comment = req.validate()?;

        match self.posts.exists(&comment.post_id).await {
            Ok(true) => {}
            Ok(false) => return Err(Error::PostNotFound(comment.post_id)),
            Err(e @ Error::Upstream { .. }) => {
                tracing::warn!(post_id = %comment.post_id, "Post lookup failed: {}", e);
                return Err(match self.unreachable {
                    UnreachablePolicy::NotFound => Error::PostNotFound(comment.post_id),
                    UnreachablePolicy::UpstreamError => e,
                });
            }
            Err(e) => return Err(e),
        }

        let created = self.store.insert(comment)?;
        tracing::info!(comment_id = %created.id, post_id = %created.post_id, "Comment created");
        Ok(created)
    }

    pub fn list(&self) -> Result<Vec<Comment>> {
        self.store.list()
    }

    pub fn list_for_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        tracing::info!(
            "Incoming request to return comments associated with post ID #{}",
            post_id
        );
        self.store.list_for_post(post_id)
    }
}
