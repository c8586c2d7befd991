use super::Error;

/// Error when a registry lookup (by type, collection or class name) finds no
/// mapper.
#[derive(Debug)]
pub(super) struct MapperNotFound {
    lookup: Box<str>,
}

impl std::error::Error for MapperNotFound {}

impl core::fmt::Display for MapperNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "mapper not found: {}", self.lookup)
    }
}

impl Error {
    /// Creates a mapper-not-found error describing the failed lookup.
    pub fn mapper_not_found(lookup: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MapperNotFound(MapperNotFound {
            lookup: lookup.into().into(),
        }))
    }

    /// Returns `true` if this error is a mapper-not-found error.
    pub fn is_mapper_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MapperNotFound(_))
    }
}
