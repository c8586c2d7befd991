use super::Error;

/// Error when a mapper is bound with options it does not understand.
///
/// This occurs when:
/// - An unknown option key is supplied
/// - `include_properties` names a field that is neither declared by the
///   collection nor supplied as an explicit property
/// - The options value has the wrong shape
///
/// A bind that fails with this error leaves the registry untouched.
#[derive(Debug)]
pub(super) struct InvalidConfiguration {
    message: Box<str>,
}

impl std::error::Error for InvalidConfiguration {}

impl core::fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConfiguration(
            InvalidConfiguration {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidConfiguration(_))
    }
}
