use super::Error;

/// Error when item-style access (`get_item`) names an unknown key.
///
/// Kept distinct from [`Error::attribute_not_found`] so callers using the
/// mapping-style API can tell the two lookups apart.
#[derive(Debug)]
pub(super) struct KeyNotFound {
    key: Box<str>,
}

impl std::error::Error for KeyNotFound {}

impl core::fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "key not found: `{}`", self.key)
    }
}

impl Error {
    /// Creates a key-not-found error.
    pub fn key_not_found(key: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::KeyNotFound(KeyNotFound {
            key: key.into().into(),
        }))
    }

    /// Returns `true` if this error is a key-not-found error.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::KeyNotFound(_))
    }
}
