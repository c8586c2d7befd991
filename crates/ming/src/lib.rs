pub mod cursor;
pub use cursor::{Cursor, FromCursor};

mod instance;
pub use instance::Instance;

pub mod mapper;
pub use mapper::{Mapper, MapperOptions};

mod model;
pub use model::Mapped;

pub mod property;
pub use property::{Accessor, FieldProperty, Property};

pub mod query;
pub use query::{InstanceQuery, Query};

mod registry;
pub use registry::Registry;

mod session;
pub use session::Session;

pub mod state;
pub use state::{InstanceState, Status, Tracker};

pub mod tracked;
pub use tracked::{Tracked, TrackedDocument};

pub use ming_core::{
    doc,
    schema::{self, Field, Type},
    Collection, Document, Error, Make, Options, Result, Value,
};
