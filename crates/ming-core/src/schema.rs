use crate::{Error, Result, Value};

use serde::{Deserialize, Serialize};

/// A field declared by a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(default)]
    pub ty: Type,

    /// Validation rejects documents missing this field.
    #[serde(default)]
    pub required: bool,
}

/// The type a field's value must have.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    #[default]
    Any,
    Bool,
    Int,
    Float,
    String,
    List,
    Document,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Field {
        Field {
            name: name.into(),
            ty,
            required: false,
        }
    }

    pub fn required(mut self) -> Field {
        self.required = true;
        self
    }

    /// Checks that `value` may be stored in this field.
    ///
    /// Null is accepted for optional fields. Integers are accepted where a
    /// float is expected.
    pub fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            if self.required {
                return Err(Error::validation(Some(self.name.as_str()), "value is required"));
            }
            return Ok(());
        }

        if self.ty.accepts(value) {
            Ok(())
        } else {
            Err(Error::validation(
                Some(self.name.as_str()),
                format!("expected {:?}, found {:?}", self.ty, value.infer_ty()),
            ))
        }
    }
}

impl Type {
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Type::Any, _) => true,
            (Type::Float, Value::I64(_)) => true,
            (ty, value) => ty == value.infer_ty(),
        }
    }
}
