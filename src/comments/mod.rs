//! Comments service
//!
//! Owns comment records. Creation synchronously asks the posts service
//! whether the referenced post exists; listing is purely local.

pub mod http;
pub mod posts_client;
pub mod server;
pub mod store;
pub mod validate;

pub use posts_client::{PostLookup, PostsClient};
pub use server::{build_router, CommentsServer};
pub use store::CommentStore;
pub use validate::CommentService;
