#[macro_use]
mod macros;

mod error;
pub use error::{Error, IntoError};

pub mod collection;
pub use collection::{Collection, Make, Options};

pub mod document;
pub use document::{Document, Value};

pub mod schema;

/// A Result type alias that uses Ming's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
