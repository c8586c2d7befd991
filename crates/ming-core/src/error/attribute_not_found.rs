use super::Error;

/// Error when an instance is asked for an attribute its mapper does not
/// declare, or a declared attribute that is absent from the document.
#[derive(Debug)]
pub(super) struct AttributeNotFound {
    ty: Box<str>,
    name: Box<str>,
}

impl std::error::Error for AttributeNotFound {}

impl core::fmt::Display for AttributeNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "`{}` has no attribute `{}`", self.ty, self.name)
    }
}

impl Error {
    /// Creates an attribute-not-found error for `name` on the type `ty`.
    pub fn attribute_not_found(ty: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::AttributeNotFound(AttributeNotFound {
            ty: ty.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an attribute-not-found error.
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AttributeNotFound(_))
    }
}
