use crate::{
    query::{InstanceQuery, Query},
    Instance, Registry, Status,
};

use ming_core::{Document, Error, Result, Value};
use std::borrow::Cow;

/// A user type whose instances are persisted as documents.
///
/// Implementors embed the [`Instance`] handed to [`Mapped::allocate`] and
/// return it from [`Mapped::instance`]. Mapped attributes live in the
/// instance's tracked document, not in Rust fields.
///
/// The item-access, representation, initialization and delete hooks all have
/// defaults that go through the mapper's accessor table. A type that needs
/// different behavior overrides the method; the defaults are only used when
/// it does not.
///
/// ```ignore
/// struct Widget {
///     ming: Instance,
/// }
///
/// impl Mapped for Widget {
///     fn allocate(instance: Instance) -> Self {
///         Widget { ming: instance }
///     }
///
///     fn instance(&self) -> &Instance {
///         &self.ming
///     }
/// }
///
/// let widget: Widget = registry.create(doc! { "name": "a" })?;
/// ```
pub trait Mapped: Sized + 'static {
    /// Fully-qualified name, used by [`Registry::by_classname`].
    fn qualified_name() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Wraps an instance without running any initialization.
    fn allocate(instance: Instance) -> Self;

    fn instance(&self) -> &Instance;

    /// Runs user initialization on a freshly allocated object. The state is
    /// already attached when this runs.
    ///
    /// The default assigns every argument to the attribute of the same name.
    fn initialize(&mut self, args: Document) -> Result<()> {
        for (name, value) in args {
            self.set_item(&name, value)?;
        }
        Ok(())
    }

    fn status(&self) -> Status {
        self.instance().status()
    }

    fn repr(&self) -> String {
        self.instance().repr()
    }

    /// Mapping-style read. An undeclared or absent attribute is reported as
    /// a missing key rather than a missing attribute.
    fn get_item(&self, name: &str) -> Result<Value> {
        self.instance().get(name).map_err(|err| {
            if err.is_attribute_not_found() {
                Error::key_not_found(name)
            } else {
                err
            }
        })
    }

    fn set_item(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.instance().set(name, value)
    }

    fn contains(&self, name: &str) -> bool {
        self.instance().has(name)
    }

    /// Marks the object for deletion at the next flush.
    fn delete(&self) {
        self.query().delete();
    }

    /// Instance-level query view bound to this object.
    fn query(&self) -> InstanceQuery<'_, Self> {
        InstanceQuery::new(self)
    }

    /// Class-level query view for this type.
    fn class_query(registry: &Registry) -> Result<Query<Self>> {
        registry.query::<Self>()
    }
}
