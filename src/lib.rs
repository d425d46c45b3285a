//! # minipost
//!
//! Two cooperating HTTP services over their own document collections:
//! - **posts** owns posts; its listing fans out to the comments service and
//!   attaches every post's comments, in store order
//! - **comments** owns comments; creating one first asks the posts service
//!   whether the referenced post exists
//!
//! ## Architecture

#![allow(clippy::result_large_err)]
//!
//! ```text
//!            GET /                          POST /
//!   client ──────────┐             ┌────────────── client
//!                    ▼             ▼
//!   ┌──────────────────┐  GET /:id ┌──────────────────┐
//!   │  posts service   │ ◄──────── │ comments service │
//!   │                  │ ────────► │                  │
//!   └────────┬─────────┘ GET /:id  └────────┬─────────┘
//!            │   (one per post, joined)     │
//!   ┌────────▼─────────┐           ┌────────▼─────────┐
//!   │ posts collection │           │ comments coll.   │
//!   └──────────────────┘           └──────────────────┘
//! ```
//!
//! Neither side holds the other's data. The post reference on a comment is
//! checked once, at write time.
//!
//! ## Usage
//!
//! ```bash
//! minipost-posts serve --port 5000 --comments comments
//! minipost-comments serve --port 5000 --posts posts
//! ```
//!
//! Every flag also reads a plain environment variable (`PORT`,
//! `DBCONNECTIONSTRING`, `DBNAME`, `POSTS`, `COMMENTS`).

pub mod comments;
pub mod common;
pub mod posts;

// Re-export commonly used types
pub use comments::CommentsServer;
pub use common::{Config, Error, Result};
pub use posts::PostsServer;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
