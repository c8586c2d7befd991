use super::Error;

/// Error when an insert collides with a document already stored under the
/// same `_id`.
#[derive(Debug)]
pub(super) struct DuplicateKey {
    collection: Box<str>,
    id: Box<str>,
}

impl std::error::Error for DuplicateKey {}

impl core::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate key: collection={} _id={}",
            self.collection, self.id
        )
    }
}

impl Error {
    /// Creates a duplicate key error.
    pub fn duplicate_key(collection: impl Into<String>, id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateKey(DuplicateKey {
            collection: collection.into().into(),
            id: id.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate key error.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateKey(_))
    }
}
