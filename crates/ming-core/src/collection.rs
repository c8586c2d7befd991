use crate::{schema::Field, Document, Result, Value};

use std::fmt::Debug;

/// How [`Collection::make`] should treat the document it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Make {
    /// Validate (and coerce) raw input, e.g. a document read from the store.
    Validate,

    /// The content was already validated while it was tracked; build the
    /// storage document without re-deriving it from raw input.
    Trusted,
}

/// Pass-through options for collection and session operations, such as
/// `upsert` or `multi`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Options {
    values: Document,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Options {
        self.values.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the boolean option `name`, or `false` when unset.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A document collection in the underlying store.
///
/// Implementations own validation and the raw storage operations. The mapper
/// calls into a collection and propagates its errors unchanged.
pub trait Collection: Debug {
    /// Name of the collection in the store.
    fn name(&self) -> &str;

    /// Fields declared by the collection, in declaration order.
    fn fields(&self) -> &[Field];

    /// Builds a storage document from `raw`.
    fn make(&self, raw: Document, mode: Make) -> Result<Document>;

    /// Inserts a new document. Fails if a document with the same `_id` exists.
    fn insert(&self, doc: &Document, options: &Options) -> Result<()>;

    /// Inserts or replaces a document by `_id`.
    fn save(&self, doc: &Document, options: &Options) -> Result<()>;

    /// Deletes the document with the same `_id` as `doc`.
    fn delete(&self, doc: &Document, options: &Options) -> Result<()>;

    /// Deletes every document matching `query`.
    fn remove(&self, query: &Document, options: &Options) -> Result<()>;

    /// Applies an update document (`$set`, `$unset`, ...) to matching documents.
    fn update_partial(&self, query: &Document, update: &Document, options: &Options)
        -> Result<()>;

    /// Returns the raw documents matching `query`, in storage order.
    fn find(&self, query: &Document, options: &Options) -> Result<Vec<Document>>;
}
