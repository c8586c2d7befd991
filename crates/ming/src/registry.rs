use crate::{query::Query, Instance, Mapped, Mapper, MapperOptions, Session};

use indexmap::IndexMap;
use ming_core::{Collection, Document, Error, Result};
use std::{any::TypeId, collections::HashMap, rc::Rc};

/// Every bound mapper, indexed by mapped type, by collection name and by
/// fully-qualified type name.
///
/// Created empty and populated through [`Registry::bind`]. Binding takes
/// `&mut self`; lookups only need `&self`.
#[derive(Debug, Default)]
pub struct Registry {
    by_type: HashMap<TypeId, Rc<Mapper>>,
    by_collection: HashMap<String, Rc<Mapper>>,

    /// Kept in bind order; the suffix fallback of
    /// [`Registry::by_classname`] returns the first match.
    by_classname: IndexMap<String, Rc<Mapper>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Binds `T` to `collection` and `session`.
    ///
    /// Binding a type again replaces its mapper in all three indexes; the
    /// last bind wins. Instances built by the previous mapper keep it. If the
    /// options are invalid the registry is left untouched.
    pub fn bind<T: Mapped>(
        &mut self,
        collection: Rc<dyn Collection>,
        session: Rc<dyn Session>,
        options: MapperOptions,
    ) -> Result<Rc<Mapper>> {
        let mapper = Rc::new(Mapper::new::<T>(collection, session, options)?);

        if let Some(previous) = self.by_type.insert(mapper.type_id(), mapper.clone()) {
            let previous_collection = previous.collection().name();
            let stale = self
                .by_collection
                .get(previous_collection)
                .is_some_and(|current| Rc::ptr_eq(current, &previous));
            if stale {
                self.by_collection.remove(previous_collection);
            }
        }

        self.by_collection
            .insert(mapper.collection().name().to_string(), mapper.clone());
        self.by_classname
            .insert(mapper.qualified_name().to_string(), mapper.clone());

        tracing::debug!(
            mapper = %mapper,
            properties = ?mapper.property_names().collect::<Vec<_>>(),
            "bind"
        );
        Ok(mapper)
    }

    pub fn by_type<T: Mapped>(&self) -> Result<&Rc<Mapper>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .ok_or_else(|| Error::mapper_not_found(format!("type `{}`", T::qualified_name())))
    }

    pub fn by_type_id(&self, type_id: TypeId) -> Result<&Rc<Mapper>> {
        self.by_type
            .get(&type_id)
            .ok_or_else(|| Error::mapper_not_found(format!("{type_id:?}")))
    }

    pub fn by_collection(&self, name: &str) -> Result<&Rc<Mapper>> {
        self.by_collection
            .get(name)
            .ok_or_else(|| Error::mapper_not_found(format!("collection `{name}`")))
    }

    /// Looks a mapper up by type name.
    ///
    /// An exact match on the fully-qualified name wins. Otherwise any name
    /// ending in `::name` or `.name` matches. When several types share the
    /// short name, the first one bound is returned.
    pub fn by_classname(&self, name: &str) -> Result<&Rc<Mapper>> {
        if let Some(mapper) = self.by_classname.get(name) {
            return Ok(mapper);
        }

        let path_suffix = format!("::{name}");
        let dotted_suffix = format!(".{name}");

        self.by_classname
            .iter()
            .find(|(classname, _)| {
                classname.ends_with(&path_suffix) || classname.ends_with(&dotted_suffix)
            })
            .map(|(_, mapper)| mapper)
            .ok_or_else(|| Error::mapper_not_found(format!("class `{name}`")))
    }

    /// The current mapper for `object`'s type.
    pub fn for_instance<T: Mapped>(&self, object: &T) -> Result<&Rc<Mapper>> {
        self.by_type_id(object.instance().mapper().type_id())
    }

    /// Bound mappers, in bind order.
    pub fn mappers(&self) -> impl Iterator<Item = &Rc<Mapper>> + '_ {
        self.by_classname.values()
    }

    /// Constructs a new `T` through its current mapper. See
    /// [`Mapper::construct`].
    pub fn create<T: Mapped>(&self, args: Document) -> Result<T> {
        self.by_type::<T>()?.construct(args)
    }

    pub fn query<T: Mapped>(&self) -> Result<Query<T>> {
        self.by_type::<T>()?.query()
    }

    /// Materializes a stored document of `collection` with the mapper bound
    /// to it.
    pub fn materialize(&self, collection: &str, raw: Document) -> Result<Instance> {
        self.by_collection(collection)?.materialize(raw)
    }
}
