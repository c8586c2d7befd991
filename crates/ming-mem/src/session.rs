use indexmap::IndexSet;
use ming::{Instance, Mapper, Session, Status};
use ming_core::{doc, err, Document, Error, Options, Result, Value};
use std::{cell::RefCell, rc::Rc};

/// Behavior switches for [`MemSession`].
#[derive(Debug, Default, Clone)]
pub struct MemSessionConfig {
    /// Flush pending changes before every query.
    pub auto_flush: bool,

    /// When a query returns a document whose instance is already live and
    /// clean, replace the instance's document with the stored copy.
    pub refresh: bool,
}

/// An identity-mapping unit of work.
///
/// Live instances are kept until they are expunged or the session is
/// cleared. [`MemSession::flush`] writes back every pending change: new
/// instances are inserted, dirty ones saved and deleted ones removed from
/// the store and expunged.
///
/// Live instances hold their mapper, which holds this session. Call
/// [`MemSession::clear`] to release them.
#[derive(Debug, Default)]
pub struct MemSession {
    config: MemSessionConfig,
    instances: RefCell<IndexSet<Instance>>,
}

impl MemSession {
    pub fn new() -> MemSession {
        MemSession::default()
    }

    pub fn with_config(config: MemSessionConfig) -> MemSession {
        MemSession {
            config,
            instances: RefCell::default(),
        }
    }

    pub fn config(&self) -> &MemSessionConfig {
        &self.config
    }

    /// Live instances, in the order they were registered.
    pub fn instances(&self) -> Vec<Instance> {
        self.instances.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    pub fn contains(&self, instance: &Instance) -> bool {
        self.instances.borrow().contains(instance)
    }

    /// Writes every pending change to the store.
    pub fn flush(&self) -> Result<()> {
        let options = Options::default();
        let mut written = 0;

        for instance in self.instances() {
            let mapper = instance.mapper().clone();
            let res = match instance.status() {
                Status::New => mapper.insert(&instance, &options),
                Status::Dirty => mapper.update(&instance, &options),
                Status::Deleted => mapper.delete(&instance, &options),
                Status::Clean => continue,
            };
            res.map_err(|e| e.context(err!("flush failed for {mapper}")))?;
            written += 1;
        }

        tracing::debug!(written, live = self.len(), "flush");
        Ok(())
    }

    /// Forgets every live instance without writing anything.
    pub fn clear(&self) {
        let instances = std::mem::take(&mut *self.instances.borrow_mut());
        tracing::debug!(expunged = instances.len(), "clear");
        drop(instances);
    }

    fn before_query(&self) -> Result<()> {
        if self.config.auto_flush {
            self.flush()?;
        }
        Ok(())
    }

    /// The live instance of `mapper`'s collection with the given `_id`.
    fn lookup(&self, mapper: &Mapper, id: &Value) -> Option<Instance> {
        let collection = mapper.collection().name();
        self.instances
            .borrow()
            .iter()
            .find(|instance| {
                instance.mapper().collection().name() == collection
                    && instance.document().get("_id") == Some(id)
            })
            .cloned()
    }

    /// Resolves a stored document to its live instance, materializing one if
    /// there is none.
    fn resolve(&self, mapper: &Rc<Mapper>, raw: Document, refresh: bool) -> Result<Instance> {
        let live = raw.get("_id").and_then(|id| self.lookup(mapper, id));

        match live {
            Some(instance) => {
                if refresh && instance.status() == Status::Clean {
                    instance.state_mut().replace_document(raw);
                }
                Ok(instance)
            }
            None => mapper.materialize(raw),
        }
    }

    fn first_match(&self, mapper: &Mapper, query: &Document, options: &Options) -> Result<Option<Document>> {
        Ok(mapper.collection().find(query, options)?.into_iter().next())
    }
}

impl Session for MemSession {
    fn save(&self, instance: &Instance) {
        if self.instances.borrow_mut().insert(instance.clone()) {
            tracing::trace!(mapper = %instance.mapper(), "session save");
        }
    }

    fn expunge(&self, instance: &Instance) {
        // Dropped once the set is released.
        let removed = self.instances.borrow_mut().shift_take(instance);
        if removed.is_some() {
            tracing::trace!(mapper = %instance.mapper(), "session expunge");
        }
    }

    fn find(&self, mapper: &Rc<Mapper>, query: &Document, options: &Options) -> Result<Vec<Instance>> {
        self.before_query()?;

        mapper
            .collection()
            .find(query, options)?
            .into_iter()
            .map(|raw| self.resolve(mapper, raw, self.config.refresh))
            .collect()
    }

    fn find_and_modify(
        &self,
        mapper: &Rc<Mapper>,
        query: &Document,
        update: &Document,
        options: &Options,
    ) -> Result<Option<Instance>> {
        self.before_query()?;

        let Some(found) = self.first_match(mapper, query, options)? else {
            return Ok(None);
        };
        let Some(id) = found.get("_id").cloned() else {
            return Err(Error::record_not_found("matched document has no `_id`"));
        };

        // A dirty live copy is written before it is refreshed.
        if let Some(live) = self.lookup(mapper, &id) {
            if live.status() == Status::Dirty {
                live.mapper().update(&live, options)?;
            }
        }

        let by_id = doc! { "_id": id };
        mapper.update_partial(&by_id, update, options)?;

        let Some(stored) = self.first_match(mapper, &by_id, options)? else {
            return Ok(None);
        };
        let instance = self.resolve(mapper, stored.clone(), false)?;
        instance.state_mut().replace_document(stored);
        instance.state().set_status(Status::Clean);
        Ok(Some(instance))
    }

    fn remove(&self, mapper: &Rc<Mapper>, query: &Document, options: &Options) -> Result<()> {
        self.before_query()?;
        mapper.remove(query, options)
    }

    fn update(
        &self,
        mapper: &Rc<Mapper>,
        query: &Document,
        update: &Document,
        options: &Options,
    ) -> Result<()> {
        self.before_query()?;
        mapper.update_partial(query, update, options)
    }

    /// The instance's current document is the precondition: the update is
    /// applied only if the stored copy still matches every field of it. On
    /// success the instance is refreshed from the store and marked clean.
    fn update_if_not_modified(
        &self,
        instance: &Instance,
        update: &Document,
        options: &Options,
    ) -> Result<bool> {
        let mapper = instance.mapper().clone();
        let expected = instance.document().to_document();

        let Some(id) = expected.get("_id").cloned() else {
            return Err(Error::record_not_found(format!(
                "{} has no `_id`",
                mapper.name()
            )));
        };

        if self.first_match(&mapper, &expected, options)?.is_none() {
            tracing::debug!(mapper = %mapper, %id, "stored copy modified");
            return Ok(false);
        }

        let by_id = doc! { "_id": id };
        mapper.update_partial(&by_id, update, options)?;

        if let Some(stored) = self.first_match(&mapper, &by_id, options)? {
            instance.state_mut().replace_document(stored);
            instance.state().set_status(Status::Clean);
        }
        Ok(true)
    }
}
