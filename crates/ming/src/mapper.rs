mod options;
pub use options::MapperOptions;

use crate::{property::Property, query::Query, Instance, InstanceState, Mapped, Session, Status};

use indexmap::IndexMap;
use ming_core::{Collection, Document, Error, Make, Options, Result};
use std::{any::TypeId, fmt, rc::Rc};

/// Binds one mapped type to a collection and a session.
///
/// Built by [`Registry::bind`](crate::Registry::bind). Holds the accessor
/// table for the type and orchestrates persistence of its instances.
pub struct Mapper {
    type_id: TypeId,

    /// Short type name, e.g. `Widget`.
    name: String,

    /// Fully-qualified type name, e.g. `app::a::Widget`.
    qualified_name: String,

    collection: Rc<dyn Collection>,
    session: Rc<dyn Session>,

    /// Accessor table, in mapping order.
    properties: IndexMap<String, Property>,
}

impl Mapper {
    pub(crate) fn new<T: Mapped>(
        collection: Rc<dyn Collection>,
        session: Rc<dyn Session>,
        options: MapperOptions,
    ) -> Result<Mapper> {
        let properties = options.resolve(collection.fields())?;
        let qualified_name = T::qualified_name().into_owned();
        let name = short_name(&qualified_name).to_string();

        Ok(Mapper {
            type_id: TypeId::of::<T>(),
            name,
            qualified_name,
            collection,
            session,
            properties,
        })
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn collection(&self) -> &Rc<dyn Collection> {
        &self.collection
    }

    pub fn session(&self) -> &Rc<dyn Session> {
        &self.session
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties.values()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }

    /// Inserts the instance's document and marks it clean.
    ///
    /// The tracked content was validated as it was written, so the storage
    /// document is built in trusted mode. On failure the status is left as
    /// it was.
    pub fn insert(&self, instance: &Instance, options: &Options) -> Result<()> {
        self.check(instance)?;

        let doc = self.storage_document(instance)?;
        self.collection.insert(&doc, options)?;

        tracing::debug!(mapper = %self, id = ?doc.get("_id"), "insert");
        self.persisted(instance, doc);
        Ok(())
    }

    /// Saves (upserts) the instance's document and marks it clean.
    pub fn update(&self, instance: &Instance, options: &Options) -> Result<()> {
        self.check(instance)?;

        let doc = self.storage_document(instance)?;
        self.collection.save(&doc, options)?;

        tracing::debug!(mapper = %self, id = ?doc.get("_id"), "update");
        self.persisted(instance, doc);
        Ok(())
    }

    /// Deletes the instance's document and expunges it from the session.
    /// The status is not changed.
    pub fn delete(&self, instance: &Instance, options: &Options) -> Result<()> {
        self.check(instance)?;

        let doc = self.storage_document(instance)?;
        self.collection.delete(&doc, options)?;

        tracing::debug!(mapper = %self, id = ?doc.get("_id"), "delete");
        self.session.expunge(instance);
        Ok(())
    }

    /// Bulk delete straight against the collection. Live instances are not
    /// touched.
    pub fn remove(&self, query: &Document, options: &Options) -> Result<()> {
        tracing::debug!(mapper = %self, %query, "remove");
        self.collection.remove(query, options)
    }

    /// Bulk partial update straight against the collection.
    pub fn update_partial(&self, query: &Document, update: &Document, options: &Options) -> Result<()> {
        tracing::debug!(mapper = %self, %query, %update, "update_partial");
        self.collection.update_partial(query, update, options)
    }

    /// Builds a clean, session-tracked instance from a stored document,
    /// without running user initialization.
    pub fn materialize(self: &Rc<Self>, raw: Document) -> Result<Instance> {
        let doc = self.collection.make(raw, Make::Validate)?;

        tracing::debug!(mapper = %self, id = ?doc.get("_id"), "materialize");
        let instance = Instance::new(self.clone(), InstanceState::with_document(doc, Status::Clean));
        self.session.save(&instance);
        Ok(instance)
    }

    /// Constructs a new `T` in two phases: state is attached before
    /// [`Mapped::initialize`] runs, and the object is registered with the
    /// session only once initialization succeeds.
    pub fn construct<T: Mapped>(self: &Rc<Self>, args: Document) -> Result<T> {
        self.expect_type::<T>()?;

        let instance = Instance::new(self.clone(), InstanceState::new());
        tracing::trace!(mapper = %self, "construct");

        let mut object = T::allocate(instance.clone());
        object.initialize(args)?;

        self.session.save(&instance);
        Ok(object)
    }

    /// Class-level query view for `T`.
    pub fn query<T: Mapped>(self: &Rc<Self>) -> Result<Query<T>> {
        self.expect_type::<T>()?;
        Ok(Query::new(self.clone()))
    }

    fn expect_type<T: Mapped>(&self) -> Result<()> {
        if self.type_id != TypeId::of::<T>() {
            return Err(Error::invalid_instance(
                T::qualified_name(),
                self.qualified_name.as_str(),
            ));
        }
        Ok(())
    }

    fn check(&self, instance: &Instance) -> Result<()> {
        if instance.mapper().type_id() != self.type_id {
            return Err(Error::invalid_instance(
                self.qualified_name.as_str(),
                instance.mapper().qualified_name(),
            ));
        }
        Ok(())
    }

    fn storage_document(&self, instance: &Instance) -> Result<Document> {
        let doc = instance.document().to_document();
        self.collection.make(doc, Make::Trusted)
    }

    /// The stored copy becomes the tracked content, so an `_id` assigned by
    /// the collection is visible on the instance.
    fn persisted(&self, instance: &Instance, doc: Document) {
        instance.state_mut().replace_document(doc);
        self.session.save(instance);
        instance.state().set_status(Status::Clean);
    }
}

fn short_name(qualified_name: &str) -> &str {
    let path = qualified_name
        .split('<')
        .next()
        .unwrap_or(qualified_name);
    path.rsplit("::").next().unwrap_or(path)
}

impl fmt::Display for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Mapper {}:{}>", self.name, self.collection.name())
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("type", &self.qualified_name)
            .field("collection", &self.collection.name())
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish()
    }
}
