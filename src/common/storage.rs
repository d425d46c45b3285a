//! Document collections backing each service
//!
//! Supports in-memory and Sled backends. A collection stores JSON objects,
//! assigns each an `id` on insert and enumerates in insertion order.

use crate::common::config::{StoreBackend, StoreConfig};
use crate::common::id::DocumentId;
use crate::common::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

pub type Document = serde_json::Map<String, Value>;

/// Field holding the store-assigned identity
pub const ID_FIELD: &str = "id";

/// Conjunction of field equality clauses. Values compare as JSON, no coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: DocumentId) -> Self {
        Self::new().eq(ID_FIELD, id.to_hex())
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

/// Trait for document collection backends
pub trait DocumentCollection: Send + Sync {
    /// Store `doc` under a fresh identity. Any client-supplied `id` is replaced.
    fn insert(&self, doc: Document) -> Result<DocumentId>;
    fn find_all(&self) -> Result<Vec<Document>>;
    fn find_many(&self, filter: &Filter) -> Result<Vec<Document>>;

    fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.find_many(filter)?.into_iter().next())
    }
}

fn stamp(mut doc: Document) -> (DocumentId, Document) {
    let id = DocumentId::generate();
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    (id, doc)
}

fn poisoned<T>(_: T) -> Error {
    Error::Store("collection lock poisoned".into())
}

/// In-memory collection (default)
#[derive(Default)]
pub struct MemCollection {
    docs: RwLock<Vec<Document>>,
}

impl MemCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentCollection for MemCollection {
    fn insert(&self, doc: Document) -> Result<DocumentId> {
        let (id, doc) = stamp(doc);
        self.docs.write().map_err(poisoned)?.push(doc);
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<Document>> {
        Ok(self.docs.read().map_err(poisoned)?.clone())
    }

    fn find_many(&self, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self
            .docs
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }
}

/// Sled collection. Keys are sled-generated monotonic ids, so tree order is
/// insertion order.
#[cfg(feature = "sled-backend")]
pub struct SledCollection {
    db: sled::Db,
    tree: sled::Tree,
}

#[cfg(feature = "sled-backend")]
impl SledCollection {
    pub fn open(db: &sled::Db, tree_name: &str) -> Result<Self> {
        Ok(Self {
            db: db.clone(),
            tree: db.open_tree(tree_name)?,
        })
    }

    fn scan(&self, filter: Option<&Filter>) -> Result<Vec<Document>> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (_, value) = entry?;
            let doc: Document = serde_json::from_slice(&value)?;
            if filter.map_or(true, |f| f.matches(&doc)) {
                out.push(doc);
            }
        }
        Ok(out)
    }
}

#[cfg(feature = "sled-backend")]
impl DocumentCollection for SledCollection {
    fn insert(&self, doc: Document) -> Result<DocumentId> {
        let (id, doc) = stamp(doc);
        let key = self.db.generate_id()?.to_be_bytes();
        self.tree.insert(key, serde_json::to_vec(&doc)?)?;
        self.tree.flush()?;
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<Document>> {
        self.scan(None)
    }

    fn find_many(&self, filter: &Filter) -> Result<Vec<Document>> {
        self.scan(Some(filter))
    }
}

enum Backend {
    Memory(Mutex<HashMap<String, Arc<MemCollection>>>),
    #[cfg(feature = "sled-backend")]
    Sled { db: sled::Db, database: String },
}

/// Handle on one configured database
pub struct Database {
    backend: Backend,
}

impl Database {
    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    pub fn open(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::new_memory()),
            StoreBackend::Sled => Self::open_sled(config),
        }
    }

    #[cfg(feature = "sled-backend")]
    fn open_sled(config: &StoreConfig) -> Result<Self> {
        let (Some(path), Some(database)) = (&config.connection, &config.database) else {
            return Err(Error::InvalidConfig(
                "db connection string or db name not defined".into(),
            ));
        };
        tracing::info!("Opening sled database {} at {}", database, path);
        Ok(Self {
            backend: Backend::Sled {
                db: sled::open(path)?,
                database: database.clone(),
            },
        })
    }

    #[cfg(not(feature = "sled-backend"))]
    fn open_sled(_config: &StoreConfig) -> Result<Self> {
        Err(Error::InvalidConfig(
            "sled backend requires the `sled-backend` feature".into(),
        ))
    }

    pub fn collection(&self, name: &str) -> Result<Arc<dyn DocumentCollection>> {
        match &self.backend {
            Backend::Memory(collections) => {
                let mut collections = collections.lock().map_err(poisoned)?;
                let collection = collections
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(MemCollection::new()));
                Ok(collection.clone())
            }
            #[cfg(feature = "sled-backend")]
            Backend::Sled { db, database } => Ok(Arc::new(SledCollection::open(
                db,
                &format!("{}.{}", database, name),
            )?)),
        }
    }
}
