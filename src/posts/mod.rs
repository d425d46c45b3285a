//! Posts service
//!
//! Owns post records. Listing fans out to the comments service to attach
//! each post's comments; single lookups and creation stay local.

pub mod aggregate;
pub mod comments_client;
pub mod http;
pub mod server;
pub mod store;

pub use aggregate::{Aggregator, CommentSource};
pub use server::{build_router, PostsServer};
pub use store::PostStore;
