//! Common utilities and types shared by the posts and comments services

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod locator;
pub mod model;
pub mod storage;
pub mod tracing_middleware;
pub mod utils;

pub use self::config::{AggregationPolicy, ClientConfig, Config, PeerConfig, StoreConfig, UnreachablePolicy};
pub use error::{Error, Result};
pub use id::DocumentId;
pub use locator::{Service, ServiceLocator, StaticLocator};
pub use model::{Comment, NewComment, NewPost, Post, PostWithComments};
pub use storage::{Database, Document, DocumentCollection, Filter, MemCollection};
