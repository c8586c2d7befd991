use super::Error;

/// Error when a document fails the collection's schema validation.
#[derive(Debug)]
pub(super) struct ValidationError {
    field: Option<Box<str>>,
    message: Box<str>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "validation failed for `{}`: {}", field, self.message),
            None => write!(f, "validation failed: {}", self.message),
        }
    }
}

impl Error {
    /// Creates a validation error, optionally naming the offending field.
    pub fn validation(field: Option<&str>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            field: field.map(Into::into),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
