use crate::{property::Property, state::InstanceState, tracked::TrackedDocument, Mapped, Mapper, Status};

use by_address::ByAddress;
use ming_core::{Error, Result, Value};
use std::{
    any::TypeId,
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// Handle to one mapped object: its state plus the mapper it belongs to.
///
/// Cloning is cheap and clones compare equal; two handles are equal only when
/// they refer to the same object. Sessions key their identity maps on this.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    inner: ByAddress<Rc<Inner>>,
}

struct Inner {
    mapper: Rc<Mapper>,
    state: RefCell<InstanceState>,
}

impl Instance {
    pub(crate) fn new(mapper: Rc<Mapper>, state: InstanceState) -> Instance {
        Instance {
            inner: ByAddress(Rc::new(Inner {
                mapper,
                state: RefCell::new(state),
            })),
        }
    }

    pub fn mapper(&self) -> &Rc<Mapper> {
        &self.inner.mapper
    }

    pub fn state(&self) -> Ref<'_, InstanceState> {
        self.inner.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, InstanceState> {
        self.inner.state.borrow_mut()
    }

    pub fn status(&self) -> Status {
        self.state().status()
    }

    pub fn document(&self) -> Ref<'_, TrackedDocument> {
        Ref::map(self.state(), InstanceState::document)
    }

    /// Mutable access to the tracked document. Writes through it soil the
    /// instance like property writes do.
    pub fn document_mut(&self) -> RefMut<'_, TrackedDocument> {
        RefMut::map(self.state_mut(), InstanceState::document_mut)
    }

    /// Reads a mapped attribute through the accessor table.
    pub fn get(&self, name: &str) -> Result<Value> {
        let property = self.property(name)?;
        property
            .get(&self.state())
            .ok_or_else(|| Error::attribute_not_found(self.mapper().name(), name))
    }

    /// Writes a mapped attribute through the accessor table.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let property = self.property(name)?;
        property.set(&mut self.state_mut(), value.into())
    }

    /// Returns `true` if the attribute is mapped and has a value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// `<Widget name="a" tags=["x"]>`, wrapped at 60 columns.
    pub fn repr(&self) -> String {
        let state = self.state();
        let mapper = self.mapper();

        let mut text = format!("<{}", mapper.name());
        for property in mapper.properties().filter(|p| p.include_in_repr()) {
            text.push(' ');
            text.push_str(property.name());
            text.push('=');
            text.push_str(&property.repr(&state));
        }
        text.push('>');

        std_util::str::wordwrap(&text, 60, 2)
    }

    /// Returns `true` if this instance was built for the mapped type `T`.
    pub fn is<T: Mapped>(&self) -> bool {
        self.mapper().type_id() == TypeId::of::<T>()
    }

    /// Views the instance as the mapped type `T`.
    pub fn downcast<T: Mapped>(self) -> Result<T> {
        if !self.is::<T>() {
            return Err(Error::invalid_instance(
                T::qualified_name(),
                self.mapper().qualified_name(),
            ));
        }
        Ok(T::allocate(self))
    }

    fn property(&self, name: &str) -> Result<&Property> {
        self.mapper()
            .property(name)
            .ok_or_else(|| Error::attribute_not_found(self.mapper().name(), name))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Instance");
        s.field("mapper", &format_args!("{}", self.mapper()));
        match self.inner.state.try_borrow() {
            Ok(state) => s
                .field("status", &state.status())
                .field("document", &**state.document()),
            Err(_) => s.field("state", &"<borrowed>"),
        };
        s.finish()
    }
}
