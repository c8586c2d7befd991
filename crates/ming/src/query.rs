use crate::{Cursor, Mapped, Mapper, Status};

use ming_core::{Document, Options, Result};
use std::{fmt, marker::PhantomData, rc::Rc};

/// Class-level query view for a mapped type. Every operation is routed
/// through the mapper's session.
pub struct Query<T> {
    mapper: Rc<Mapper>,
    _p: PhantomData<T>,
}

impl<T: Mapped> Query<T> {
    pub(crate) fn new(mapper: Rc<Mapper>) -> Query<T> {
        Query {
            mapper,
            _p: PhantomData,
        }
    }

    pub fn mapper(&self) -> &Rc<Mapper> {
        &self.mapper
    }

    pub fn find(&self, query: &Document) -> Result<Cursor<T>> {
        self.find_with(query, &Options::default())
    }

    pub fn find_with(&self, query: &Document, options: &Options) -> Result<Cursor<T>> {
        let instances = self.mapper.session().find(&self.mapper, query, options)?;
        Ok(Cursor::new(instances))
    }

    /// Same as [`Query::find`], for criteria built inline with `doc!`.
    pub fn find_by(&self, criteria: Document) -> Result<Cursor<T>> {
        self.find(&criteria)
    }

    /// The first match, or `None`.
    pub fn get(&self, criteria: Document) -> Result<Option<T>> {
        self.find(&criteria)?.first()
    }

    pub fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        options: &Options,
    ) -> Result<Option<T>> {
        self.mapper
            .session()
            .find_and_modify(&self.mapper, query, update, options)?
            .map(|instance| instance.downcast())
            .transpose()
    }

    pub fn remove(&self, query: &Document, options: &Options) -> Result<()> {
        self.mapper.session().remove(&self.mapper, query, options)
    }

    pub fn update(&self, query: &Document, update: &Document, options: &Options) -> Result<()> {
        self.mapper
            .session()
            .update(&self.mapper, query, update, options)
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&format_args!("{}", self.mapper)).finish()
    }
}

/// Query view bound to one object.
pub struct InstanceQuery<'a, T> {
    object: &'a T,
}

impl<'a, T: Mapped> InstanceQuery<'a, T> {
    pub fn new(object: &'a T) -> InstanceQuery<'a, T> {
        InstanceQuery { object }
    }

    /// Optimistic update of this object's stored copy. Returns `false` if
    /// the stored copy no longer matches the object's document.
    pub fn update_if_not_modified(&self, update: &Document, options: &Options) -> Result<bool> {
        let instance = self.object.instance();
        instance
            .mapper()
            .session()
            .update_if_not_modified(instance, update, options)
    }

    /// Class-level find for the object's type.
    pub fn find(&self, query: &Document) -> Result<Cursor<T>> {
        Query::<T>::new(self.object.instance().mapper().clone()).find(query)
    }

    /// Marks the object deleted. The session removes it from the store at
    /// its next flush.
    pub fn delete(&self) {
        let instance = self.object.instance();
        instance.state().set_status(Status::Deleted);
        tracing::debug!(mapper = %instance.mapper(), "marked deleted");
    }
}
