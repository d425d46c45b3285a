//! Post records over a document collection

use crate::common::storage::{DocumentCollection, Filter, ID_FIELD};
use crate::common::{DocumentId, NewPost, Post, Result};
use serde_json::Value;
use std::sync::Arc;

pub const POSTS_COLLECTION: &str = "posts";

#[derive(Clone)]
pub struct PostStore {
    collection: Arc<dyn DocumentCollection>,
}

impl PostStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    pub fn create(&self, req: NewPost) -> Result<Post> {
        let mut doc = req.into_document()?;
        let id = self.collection.insert(doc.clone())?;
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        Post::from_document(doc)
    }

    /// Look a post up by id. A malformed id is `Error::InvalidId`.
    pub fn get(&self, id: &str) -> Result<Option<Post>> {
        let id: DocumentId = id.parse()?;
        self.collection
            .find_one(&Filter::by_id(id))?
            .map(Post::from_document)
            .transpose()
    }

    /// All posts in store enumeration order
    pub fn list(&self) -> Result<Vec<Post>> {
        self.collection
            .find_all()?
            .into_iter()
            .map(Post::from_document)
            .collect()
    }
}
