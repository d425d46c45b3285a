//! Comment records over a document collection

use crate::common::model::ValidComment;
use crate::common::storage::{DocumentCollection, Filter, ID_FIELD};
use crate::common::{Comment, Result};
use serde_json::Value;
use std::sync::Arc;

pub const COMMENTS_COLLECTION: &str = "comments";

#[derive(Clone)]
pub struct CommentStore {
    collection: Arc<dyn DocumentCollection>,
}

impl CommentStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    pub fn insert(&self, comment: ValidComment) -> Result<Comment> {
        let mut doc = comment.into_document();
        let id = self.collection.insert(doc.clone())?;
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        Comment::from_document(doc)
    }

    pub fn list(&self) -> Result<Vec<Comment>> {
        self.collection
            .find_all()?
            .into_iter()
            .map(Comment::from_document)
            .collect()
    }

    pub fn list_for_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.collection
            .find_many(&Filter::new().eq("postId", post_id))?
            .into_iter()
            .map(Comment::from_document)
            .collect()
    }
}
