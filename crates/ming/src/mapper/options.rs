use crate::property::Property;

use indexmap::IndexMap;
use ming_core::{
    schema::{Field, Type},
    Error, Result,
};
use serde::Deserialize;

/// Options recognized when binding a mapper.
///
/// Build them in code, or load them from configuration with
/// [`MapperOptions::from_json`], which rejects unknown keys.
#[derive(Debug, Default, Clone)]
pub struct MapperOptions {
    /// Explicit properties, merged over the collection's declared fields.
    pub properties: IndexMap<String, Property>,

    /// When set, only these properties are mapped, in this order.
    pub include_properties: Option<Vec<String>>,

    /// Properties dropped after merging and inclusion.
    pub exclude_properties: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(default)]
    properties: IndexMap<String, RawProperty>,
    #[serde(default)]
    include_properties: Option<Vec<String>>,
    #[serde(default)]
    exclude_properties: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProperty {
    #[serde(default)]
    ty: Type,
    #[serde(default)]
    required: bool,
    #[serde(default = "default_include_in_repr")]
    include_in_repr: bool,
}

fn default_include_in_repr() -> bool {
    true
}

impl MapperOptions {
    pub fn new() -> MapperOptions {
        MapperOptions::default()
    }

    /// Parses options from a JSON object such as
    /// `{"exclude_properties": ["secret"], "properties": {"score": {"ty": "int"}}}`.
    pub fn from_json(value: serde_json::Value) -> Result<MapperOptions> {
        let raw: RawOptions = serde_json::from_value(value)
            .map_err(|err| Error::invalid_configuration(err.to_string()))?;

        let properties = raw
            .properties
            .into_iter()
            .map(|(name, raw)| {
                let field = Field {
                    name: name.clone(),
                    ty: raw.ty,
                    required: raw.required,
                };
                let property = Property::from(field);
                let property = if raw.include_in_repr {
                    property
                } else {
                    property.hidden()
                };
                (name, property)
            })
            .collect();

        Ok(MapperOptions {
            properties,
            include_properties: raw.include_properties,
            exclude_properties: raw.exclude_properties,
        })
    }

    pub fn property(mut self, name: impl Into<String>, property: impl Into<Property>) -> MapperOptions {
        self.properties.insert(name.into(), property.into());
        self
    }

    pub fn include_properties<I>(mut self, names: I) -> MapperOptions
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.include_properties = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_properties<I>(mut self, names: I) -> MapperOptions
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.exclude_properties = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the accessor table: declared fields, overridden by explicit
    /// properties, restricted by `include_properties`, minus
    /// `exclude_properties`.
    pub(crate) fn resolve(self, fields: &[Field]) -> Result<IndexMap<String, Property>> {
        let mut properties: IndexMap<String, Property> = fields
            .iter()
            .map(|field| (field.name.clone(), Property::from(field.clone())))
            .collect();
        properties.extend(self.properties);

        // An empty include list restricts nothing.
        if let Some(include) = self.include_properties.filter(|names| !names.is_empty()) {
            let mut included = IndexMap::with_capacity(include.len());
            for name in include {
                let Some(property) = properties.swap_remove(&name) else {
                    return Err(Error::invalid_configuration(format!(
                        "include_properties names undeclared field `{name}`"
                    )));
                };
                included.insert(name, property);
            }
            properties = included;
        }

        for name in &self.exclude_properties {
            properties.shift_remove(name);
        }

        Ok(properties
            .into_iter()
            .map(|(name, property)| {
                let property = property.named(&name);
                (name, property)
            })
            .collect())
    }
}
