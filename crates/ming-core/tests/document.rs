use ming_core::{doc, Document, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std_util::prelude::*;

#[test]
fn insert_keeps_field_order() {
    let mut doc = doc! { "b": 1, "a": 2 };
    doc.insert("c", 3);
    doc.insert("b", 4);

    assert_eq!(doc.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
    assert_eq!(doc.get("b"), Some(&Value::from(4)));
}

#[test]
fn remove_preserves_order_of_the_rest() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3 };
    assert_eq!(doc.remove("b"), Some(Value::from(2)));
    assert_none!(doc.remove("b"));
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "c"]);
}

#[test]
fn dotted_paths() {
    let doc = doc! { "meta": doc! { "size": doc! { "w": 3 } }, "tags": vec!["x"] };

    assert_eq!(doc.get_path("meta.size.w"), Some(&Value::from(3)));
    assert_none!(doc.get_path("meta.colour"));
    assert_none!(doc.get_path("tags.0"));
    assert_none!(doc.get_path(""));
}

#[test]
fn matching_criteria() {
    let doc = doc! { "name": "a", "meta": doc! { "size": 3 } };

    assert!(doc.matches(&Document::new()));
    assert!(doc.matches(&doc! { "name": "a" }));
    assert!(doc.matches(&doc! { "name": "a", "meta.size": 3 }));
    assert!(!doc.matches(&doc! { "name": "b" }));
    assert!(!doc.matches(&doc! { "colour": Value::Null }));
}

#[test]
fn display() {
    let doc = doc! { "name": "a", "tags": vec!["x", "y"], "size": 1.5, "gone": Value::Null };
    assert_eq!(
        doc.to_string(),
        r#"{"name": "a", "tags": ["x", "y"], "size": 1.5, "gone": null}"#
    );
}

#[test]
fn json_conversion() {
    let doc = assert_ok!(Document::from_json(json!({
        "name": "a",
        "size": 3,
        "ratio": 0.5,
        "tags": ["x"],
        "meta": { "ok": true },
    })));

    assert_eq!(
        doc,
        doc! {
            "name": "a",
            "size": 3,
            "ratio": 0.5,
            "tags": vec!["x"],
            "meta": doc! { "ok": true },
        }
    );
    assert_eq!(doc.to_json()["meta"]["ok"], json!(true));

    let err = assert_err!(Document::from_json(json!([1, 2])));
    assert!(err.is_validation());
}

#[test]
fn serde_shape_is_plain_json() {
    let doc = doc! { "n": 1, "f": 2.5, "s": "x", "l": vec![Value::Null] };
    let text = serde_json::to_string(&doc).unwrap();
    assert_eq!(text, r#"{"n":1,"f":2.5,"s":"x","l":[null]}"#);

    let back: Document = serde_json::from_str(&text).unwrap();
    assert_eq!(back.get("n"), Some(&Value::I64(1)));
    assert_eq!(back.get("f"), Some(&Value::F64(2.5)));
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from(Some("a")), "a");
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(7), 7_i64);
    assert_eq!(Value::from(7).as_f64(), Some(7.0));
    assert_eq!(Value::from("a").as_i64(), None);

    let mut list = Value::from(vec![1, 2]);
    list.as_list_mut().unwrap().push(Value::from(3));
    assert_eq!(list.as_list().map(<[Value]>::len), Some(3));
}

#[test]
fn collect_and_extend() {
    let mut doc: Document = [("a", 1), ("b", 2)].into_iter().collect();
    doc.extend([("c", "three")]);

    assert_eq!(doc, doc! { "a": 1, "b": 2, "c": "three" });
    assert_eq!(doc.len(), 3);

    let names: Vec<String> = doc.into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["a", "b", "c"]);
}
