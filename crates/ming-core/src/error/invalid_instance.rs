use super::Error;

/// Error when an instance is viewed as a mapped type it was not built for.
#[derive(Debug)]
pub(super) struct InvalidInstance {
    expected: Box<str>,
    actual: Box<str>,
}

impl std::error::Error for InvalidInstance {}

impl core::fmt::Display for InvalidInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid instance: expected `{}`, found `{}`",
            self.expected, self.actual
        )
    }
}

impl Error {
    /// Creates an invalid instance error.
    pub fn invalid_instance(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidInstance(InvalidInstance {
            expected: expected.into().into(),
            actual: actual.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid instance error.
    pub fn is_invalid_instance(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidInstance(_))
    }
}
