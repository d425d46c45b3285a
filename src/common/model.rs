//! Records exchanged between clients and the two services

use crate::common::storage::{Document, ID_FIELD};
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A post as stored. Unknown payload fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Document,
}

/// A comment as stored. `post_id` is an opaque reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "postId")]
    pub post_id: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: Document,
}

/// A post with its comments attached. `comments` is `null` when the lookup
/// failed under the degrade policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    pub fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(doc))?)
    }

    pub fn with_comments(self, comments: Option<Vec<Comment>>) -> PostWithComments {
        PostWithComments {
            post: self,
            comments,
        }
    }
}

impl Comment {
    pub fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(doc))?)
    }
}

fn required(field: Option<String>) -> Result<String> {
    field.filter(|s| !s.is_empty()).ok_or(Error::InvalidPayload)
}

fn strip_reserved(extra: &mut Document, reserved: &[&str]) {
    for key in reserved {
        extra.remove(*key);
    }
}

/// Body of `POST /` on the posts service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewPost {
    /// The document to insert. Fails with `InvalidPayload` on a missing field.
    pub fn into_document(self) -> Result<Document> {
        let title = required(self.title)?;
        let description = required(self.description)?;
        let mut doc = self.extra;
        strip_reserved(&mut doc, &[ID_FIELD, "comments"]);
        doc.insert("title".into(), Value::String(title));
        doc.insert("description".into(), Value::String(description));
        Ok(doc)
    }
}

/// Body of `POST /` on the comments service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

/// A comment payload that passed field validation
#[derive(Debug, Clone)]
pub struct ValidComment {
    pub post_id: String,
    pub message: String,
    pub extra: Document,
}

impl NewComment {
    pub fn validate(self) -> Result<ValidComment> {
        let post_id = required(self.post_id)?;
        let message = required(self.message)?;
        let mut extra = self.extra;
        strip_reserved(&mut extra, &[ID_FIELD]);
        Ok(ValidComment {
            post_id,
            message,
            extra,
        })
    }
}

impl ValidComment {
    pub fn into_document(self) -> Document {
        let mut doc = self.extra;
        doc.insert("postId".into(), Value::String(self.post_id));
        doc.insert("message".into(), Value::String(self.message));
        doc
    }
}
