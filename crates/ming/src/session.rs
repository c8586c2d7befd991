use crate::{Instance, Mapper};

use ming_core::{Document, Options, Result};
use std::{fmt, rc::Rc};

/// Unit of work that owns the live set of instances.
///
/// Mappers call `save` and `expunge` as instances are persisted or removed.
/// Queries are routed through the session so it can answer them from its
/// identity map. Implementations decide when dirty instances are written
/// back; a session must delete and expunge an instance whose status is
/// `Deleted`, never re-save it.
pub trait Session: fmt::Debug {
    /// Registers `instance` as live.
    fn save(&self, instance: &Instance);

    /// Removes `instance` from the live set.
    fn expunge(&self, instance: &Instance);

    /// Instances of `mapper`'s type whose documents match `query`.
    fn find(&self, mapper: &Rc<Mapper>, query: &Document, options: &Options)
        -> Result<Vec<Instance>>;

    /// Applies `update` to the first match and returns it, re-read from the
    /// store.
    fn find_and_modify(
        &self,
        mapper: &Rc<Mapper>,
        query: &Document,
        update: &Document,
        options: &Options,
    ) -> Result<Option<Instance>>;

    fn remove(&self, mapper: &Rc<Mapper>, query: &Document, options: &Options) -> Result<()>;

    fn update(
        &self,
        mapper: &Rc<Mapper>,
        query: &Document,
        update: &Document,
        options: &Options,
    ) -> Result<()>;

    /// Applies `update` to the stored copy of `instance` only if it still
    /// matches the instance's document. Returns `false` when the stored copy
    /// changed underneath.
    fn update_if_not_modified(
        &self,
        instance: &Instance,
        update: &Document,
        options: &Options,
    ) -> Result<bool>;
}
