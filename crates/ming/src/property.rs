use crate::state::InstanceState;

use ming_core::{schema::Field, Result, Value};
use std::{fmt, rc::Rc};

/// Reads and writes one mapped attribute of an instance.
///
/// The mapper builds its accessor table from these at bind time. The default
/// implementation, [`FieldProperty`], stores the attribute under its own name
/// in the tracked document.
pub trait Accessor: fmt::Debug {
    /// Returns the attribute's value, or `None` when the instance has none.
    fn get(&self, name: &str, state: &InstanceState) -> Option<Value>;

    fn set(&self, name: &str, state: &mut InstanceState, value: Value) -> Result<()>;

    /// Renders the attribute for the instance's textual representation.
    fn repr(&self, name: &str, state: &InstanceState) -> String {
        match self.get(name, state) {
            Some(value) => value.to_string(),
            None => "<missing>".to_string(),
        }
    }
}

/// Stores an attribute as a field of the tracked document, validating
/// writes against the declared [`Field`] when there is one.
#[derive(Debug, Default, Clone)]
pub struct FieldProperty {
    field: Option<Field>,
}

impl FieldProperty {
    pub fn new(field: Field) -> FieldProperty {
        FieldProperty { field: Some(field) }
    }

    /// An untyped property: any value is accepted.
    pub fn untyped() -> FieldProperty {
        FieldProperty::default()
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }
}

impl Accessor for FieldProperty {
    fn get(&self, name: &str, state: &InstanceState) -> Option<Value> {
        state.document().get(name).cloned()
    }

    fn set(&self, name: &str, state: &mut InstanceState, value: Value) -> Result<()> {
        if let Some(field) = &self.field {
            field.validate(&value)?;
        }
        state.document_mut().insert(name, value);
        Ok(())
    }
}

/// One entry of a mapper's accessor table.
///
/// A property is named by the mapper when it is bound, after the key it was
/// registered under.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    include_in_repr: bool,
    accessor: Rc<dyn Accessor>,
}

impl Property {
    pub fn new(accessor: impl Accessor + 'static) -> Property {
        Property {
            name: String::new(),
            include_in_repr: true,
            accessor: Rc::new(accessor),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn include_in_repr(&self) -> bool {
        self.include_in_repr
    }

    /// Leaves the property out of the instance's textual representation.
    pub fn hidden(mut self) -> Property {
        self.include_in_repr = false;
        self
    }

    pub fn accessor(&self) -> &dyn Accessor {
        &*self.accessor
    }

    pub fn get(&self, state: &InstanceState) -> Option<Value> {
        self.accessor.get(&self.name, state)
    }

    pub fn set(&self, state: &mut InstanceState, value: Value) -> Result<()> {
        self.accessor.set(&self.name, state, value)
    }

    pub fn repr(&self, state: &InstanceState) -> String {
        self.accessor.repr(&self.name, state)
    }

    pub(crate) fn named(mut self, name: &str) -> Property {
        self.name = name.to_string();
        self
    }
}

impl From<Field> for Property {
    fn from(field: Field) -> Property {
        Property::new(FieldProperty::new(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Status;
    use ming_core::{doc, schema::Type};

    #[test]
    fn field_property_reads_and_writes_document() {
        let prop = Property::from(Field::new("name", Type::String)).named("name");
        let mut state = InstanceState::with_document(doc! { "name": "a" }, Status::Clean);

        assert_eq!(prop.get(&state), Some(Value::from("a")));
        prop.set(&mut state, Value::from("b")).unwrap();
        assert_eq!(prop.get(&state), Some(Value::from("b")));
        assert!(state.is_dirty());
    }

    #[test]
    fn field_property_validates_writes() {
        let prop = Property::from(Field::new("size", Type::Int)).named("size");
        let mut state = InstanceState::with_document(doc! { "size": 1 }, Status::Clean);

        let err = prop.set(&mut state, Value::from("big")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(prop.get(&state), Some(Value::from(1)));
        assert!(state.is_clean());
    }

    #[test]
    fn missing_value_repr() {
        let prop = Property::new(FieldProperty::untyped()).named("colour");
        let state = InstanceState::new();
        assert_eq!(prop.get(&state), None);
        assert_eq!(prop.repr(&state), "<missing>");
    }

    #[test]
    fn hidden_property() {
        let prop = Property::new(FieldProperty::untyped()).hidden();
        assert!(!prop.include_in_repr());
    }
}
