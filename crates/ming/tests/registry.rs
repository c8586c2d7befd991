mod support;

use support::{widgets, Fixture, Widget};

use ming::{doc, Instance, Mapped, MapperOptions, Registry};
use ming_mem::{MemCollection, MemSession};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std_util::prelude::*;

mod a {
    use ming::{Instance, Mapped};

    #[derive(Debug)]
    pub struct Widget {
        pub ming: Instance,
    }

    impl Mapped for Widget {
        fn allocate(instance: Instance) -> Self {
            Widget { ming: instance }
        }

        fn instance(&self) -> &Instance {
            &self.ming
        }
    }
}

mod b {
    use ming::{Instance, Mapped};

    #[derive(Debug)]
    pub struct Widget {
        pub ming: Instance,
    }

    impl Mapped for Widget {
        fn allocate(instance: Instance) -> Self {
            Widget { ming: instance }
        }

        fn instance(&self) -> &Instance {
            &self.ming
        }
    }
}

#[derive(Debug)]
struct Unbound {
    ming: Instance,
}

impl Mapped for Unbound {
    fn allocate(instance: Instance) -> Self {
        Unbound { ming: instance }
    }

    fn instance(&self) -> &Instance {
        &self.ming
    }
}

fn property_names(registry: &Registry) -> Vec<String> {
    registry
        .by_type::<Widget>()
        .unwrap()
        .property_names()
        .map(str::to_string)
        .collect()
}

#[test]
fn by_type_and_by_collection_agree() {
    let f = Fixture::new();
    let by_type = f.registry.by_type::<Widget>().unwrap();
    let by_collection = f.registry.by_collection("widgets").unwrap();

    assert!(Rc::ptr_eq(by_type, by_collection));
    assert_eq!(by_type.to_string(), "<Mapper Widget:widgets>");
    assert_eq!(by_type.name(), "Widget");
    assert!(by_type.qualified_name().ends_with("::Widget"));
    assert_eq!(property_names(&f.registry), ["_id", "name", "tags", "meta"]);
}

#[test]
fn unbound_lookups_fail() {
    let f = Fixture::new();

    assert!(assert_err!(f.registry.by_type::<Unbound>()).is_mapper_not_found());
    assert!(assert_err!(f.registry.by_collection("gizmos")).is_mapper_not_found());
    assert!(assert_err!(f.registry.by_classname("Unbound")).is_mapper_not_found());
    assert!(assert_err!(f.registry.create::<Unbound>(doc! {})).is_mapper_not_found());
    assert!(assert_err!(Unbound::class_query(&f.registry)).is_mapper_not_found());
}

#[test]
fn last_bind_wins() {
    let mut f = Fixture::with_options(MapperOptions::new().exclude_properties(["tags"]));
    assert_eq!(property_names(&f.registry), ["_id", "name", "meta"]);

    let first = f.registry.by_type::<Widget>().unwrap().clone();
    let second = f
        .registry
        .bind::<Widget>(
            f.collection.clone(),
            f.session.clone(),
            MapperOptions::new().include_properties(["name"]),
        )
        .unwrap();

    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(property_names(&f.registry), ["name"]);
    assert!(Rc::ptr_eq(f.registry.by_collection("widgets").unwrap(), &second));
    assert!(Rc::ptr_eq(
        f.registry.by_classname(second.qualified_name()).unwrap(),
        &second
    ));
    assert_eq!(f.registry.mappers().count(), 1);
}

#[test]
fn instances_keep_the_mapper_they_were_built_with() {
    let mut f = Fixture::new();
    let before: Widget = f.registry.create(doc! { "name": "a" }).unwrap();

    f.registry
        .bind::<Widget>(
            f.collection.clone(),
            f.session.clone(),
            MapperOptions::new().include_properties(["name"]),
        )
        .unwrap();
    let after: Widget = f.registry.create(doc! { "name": "b" }).unwrap();

    assert!(before.instance().mapper().property("tags").is_some());
    assert!(after.instance().mapper().property("tags").is_none());
    assert!(Rc::ptr_eq(
        f.registry.for_instance(&before).unwrap(),
        after.instance().mapper()
    ));
}

#[test]
fn rebinding_to_another_collection_drops_the_stale_entry() {
    let mut f = Fixture::new();
    let gizmos = Rc::new(MemCollection::new("gizmos"));

    f.registry
        .bind::<Widget>(gizmos, f.session.clone(), MapperOptions::new())
        .unwrap();

    assert!(assert_err!(f.registry.by_collection("widgets")).is_mapper_not_found());
    assert!(Rc::ptr_eq(
        f.registry.by_collection("gizmos").unwrap(),
        f.registry.by_type::<Widget>().unwrap()
    ));
}

#[test]
fn failed_bind_leaves_registry_untouched() {
    let mut f = Fixture::new();
    let bound = f.registry.by_type::<Widget>().unwrap().clone();

    let err = assert_err!(f.registry.bind::<Widget>(
        f.collection.clone(),
        f.session.clone(),
        MapperOptions::new().include_properties(["colour"]),
    ));
    assert!(err.is_invalid_configuration());

    let err = assert_err!(MapperOptions::from_json(serde_json::json!({
        "include": ["name"],
    })));
    assert!(err.is_invalid_configuration());

    assert!(Rc::ptr_eq(f.registry.by_type::<Widget>().unwrap(), &bound));
    assert!(Rc::ptr_eq(f.registry.by_collection("widgets").unwrap(), &bound));
}

#[test]
fn bind_from_json_options() {
    let options = MapperOptions::from_json(serde_json::json!({
        "properties": { "score": { "ty": "int" } },
        "exclude_properties": ["meta", "tags"],
    }))
    .unwrap();
    let f = Fixture::with_options(options);

    assert_eq!(property_names(&f.registry), ["_id", "name", "score"]);

    let widget: Widget = f.registry.create(doc! { "score": 3 }).unwrap();
    assert!(assert_err!(widget.set_item("score", "high")).is_validation());
}

#[test]
fn classname_lookup_prefers_exact_then_first_suffix_match() {
    let session = Rc::new(MemSession::new());
    let mut registry = Registry::new();

    let first = registry
        .bind::<a::Widget>(Rc::new(widgets()), session.clone(), MapperOptions::new())
        .unwrap();
    let second = registry
        .bind::<b::Widget>(
            Rc::new(MemCollection::new("other_widgets")),
            session.clone(),
            MapperOptions::new(),
        )
        .unwrap();

    assert!(first.qualified_name().ends_with("a::Widget"));
    assert!(Rc::ptr_eq(
        registry.by_classname(second.qualified_name()).unwrap(),
        &second
    ));

    // Ambiguous short name: the first type bound wins.
    let found = assert_ok!(registry.by_classname("Widget"));
    assert!(Rc::ptr_eq(found, &first));

    let found = assert_ok!(registry.by_classname("b::Widget"));
    assert!(Rc::ptr_eq(found, &second));

    let widget: b::Widget = registry.create(doc! {}).unwrap();
    assert!(widget.ming.is::<b::Widget>());
    assert!(!widget.ming.is::<a::Widget>());

    let err = assert_err!(widget.ming.clone().downcast::<a::Widget>());
    assert!(err.is_invalid_instance());

    session.clear();
}
