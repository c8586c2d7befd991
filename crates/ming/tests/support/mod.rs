#![allow(dead_code)]

use ming::{Field, Instance, Mapped, MapperOptions, Registry, Type};
use ming_mem::{ExecLog, MemCollection, MemSession};
use std::rc::Rc;

#[derive(Debug)]
pub struct Widget {
    ming: Instance,
}

impl Mapped for Widget {
    fn allocate(instance: Instance) -> Self {
        Widget { ming: instance }
    }

    fn instance(&self) -> &Instance {
        &self.ming
    }
}

pub fn widgets() -> MemCollection {
    MemCollection::new("widgets")
        .field(Field::new("_id", Type::Any))
        .field(Field::new("name", Type::String))
        .field(Field::new("tags", Type::List))
        .field(Field::new("meta", Type::Document))
}

/// A registry with `Widget` bound to an in-memory `widgets` collection.
pub struct Fixture {
    pub registry: Registry,
    pub session: Rc<MemSession>,
    pub collection: Rc<MemCollection>,
}

impl Fixture {
    pub fn new() -> Fixture {
        Fixture::with_options(MapperOptions::new())
    }

    pub fn with_options(options: MapperOptions) -> Fixture {
        let session = Rc::new(MemSession::new());
        let collection = Rc::new(widgets());

        let mut registry = Registry::new();
        registry
            .bind::<Widget>(collection.clone(), session.clone(), options)
            .unwrap();

        Fixture {
            registry,
            session,
            collection,
        }
    }

    pub fn log(&self) -> ExecLog {
        self.collection.exec_log()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.session.clear();
    }
}
