use ming::{doc, Field, Instance, Mapped, MapperOptions, Registry, Session, Status, Type};
use ming_mem::{MemCollection, MemSession, Op};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std_util::prelude::*;

#[derive(Debug)]
struct Note {
    ming: Instance,
}

impl Mapped for Note {
    fn allocate(instance: Instance) -> Self {
        Note { ming: instance }
    }

    fn instance(&self) -> &Instance {
        &self.ming
    }
}

fn setup() -> (Registry, Rc<MemSession>, Rc<MemCollection>) {
    let session = Rc::new(MemSession::new());
    let collection = Rc::new(
        MemCollection::new("notes")
            .field(Field::new("_id", Type::Any))
            .field(Field::new("text", Type::String).required()),
    );

    let mut registry = Registry::new();
    registry
        .bind::<Note>(collection.clone(), session.clone(), MapperOptions::new())
        .unwrap();

    (registry, session, collection)
}

#[test]
fn flush_writes_each_pending_instance_once() {
    let (registry, session, collection) = setup();
    let log = collection.exec_log();

    let kept: Note = registry.create(doc! { "text": "kept" }).unwrap();
    let edited: Note = registry.create(doc! { "text": "draft" }).unwrap();
    let dropped: Note = registry.create(doc! { "text": "gone" }).unwrap();
    session.flush().unwrap();

    assert_eq!(log.len(), 3);
    assert!(log.with_ops(|ops| ops.iter().all(|op| matches!(op, Op::Insert(_)))));
    log.clear();

    edited.set_item("text", "final").unwrap();
    dropped.delete();
    session.flush().unwrap();

    assert_eq!(
        log.pop(),
        Some(Op::Save(doc! { "_id": 2, "text": "final" }))
    );
    assert_eq!(log.pop(), Some(Op::Delete(doc! { "_id": 3, "text": "gone" })));
    assert_none!(log.pop());

    assert_eq!(kept.status(), Status::Clean);
    assert_eq!(session.len(), 2);
    assert_eq!(
        collection.documents(),
        vec![
            doc! { "_id": 1, "text": "kept" },
            doc! { "_id": 2, "text": "final" }
        ]
    );

    session.clear();
}

#[test]
fn flush_stops_at_first_collection_error() {
    let (registry, session, collection) = setup();

    let _: Note = registry.create(doc! { "_id": 1, "text": "a" }).unwrap();
    session.flush().unwrap();

    let clash: Note = registry.create(doc! { "_id": 1, "text": "b" }).unwrap();
    let err = assert_err!(session.flush());

    assert!(err.root().is_duplicate_key());
    assert!(err.to_string().starts_with("flush failed for <Mapper Note:notes>: duplicate key"));
    assert_eq!(clash.status(), Status::New);
    assert_eq!(collection.len(), 1);

    session.clear();
}

#[test]
fn generated_ids_do_not_clash_with_explicit_ones() {
    let (registry, session, collection) = setup();

    let _: Note = registry.create(doc! { "_id": 1, "text": "a" }).unwrap();
    session.flush().unwrap();

    let note: Note = registry.create(doc! { "text": "b" }).unwrap();
    assert_ok!(session.flush());

    assert_eq!(note.status(), Status::Clean);
    assert_eq!(note.get_item("_id").unwrap(), 2_i64);
    assert_eq!(collection.len(), 2);

    session.clear();
}

#[test]
fn save_and_expunge_track_identity() {
    let (registry, session, _collection) = setup();
    let note: Note = registry.create(doc! { "text": "a" }).unwrap();
    let handle = note.instance().clone();

    session.save(&handle);
    assert_eq!(session.len(), 1);

    session.expunge(&handle);
    assert!(!session.contains(&handle));
    assert!(session.is_empty());

    // Expunging twice is harmless.
    session.expunge(&handle);
    assert!(session.is_empty());
}

#[test]
fn clear_releases_instances() {
    let (registry, session, _collection) = setup();
    let note: Note = registry.create(doc! { "text": "a" }).unwrap();
    let weak = Rc::downgrade(note.instance().mapper());

    drop(note);
    drop(registry);
    assert!(weak.upgrade().is_some());

    session.clear();
    assert!(weak.upgrade().is_none());
}
