use ming_core::{
    schema::{Field, Type},
    Options, Value,
};
use std_util::prelude::*;

#[test]
fn optional_fields_accept_null() {
    let field = Field::new("size", Type::Int);
    assert_ok!(field.validate(&Value::Null));
    assert_ok!(field.validate(&Value::from(3)));

    let err = assert_err!(field.validate(&Value::from("big")));
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "validation failed for `size`: expected Int, found String"
    );
}

#[test]
fn required_fields_reject_null() {
    let field = Field::new("name", Type::String).required();
    let err = assert_err!(field.validate(&Value::Null));
    assert_eq!(err.to_string(), "validation failed for `name`: value is required");
}

#[test]
fn type_acceptance() {
    assert!(Type::Any.accepts(&Value::from(vec![1])));
    assert!(Type::Float.accepts(&Value::from(1)));
    assert!(!Type::Int.accepts(&Value::from(1.5)));
    assert!(Type::Document.accepts(&Value::from(ming_core::doc! {})));
    assert!(!Type::List.accepts(&Value::from("x")));
}

#[test]
fn field_from_json() {
    let field: Field = serde_json::from_value(serde_json::json!({
        "name": "tags",
        "ty": "list",
    }))
    .unwrap();

    assert_eq!(field, Field::new("tags", Type::List));
}

#[test]
fn options_flags() {
    let options = Options::new().set("multi", true).set("limit", 3);

    assert!(options.flag("multi"));
    assert!(!options.flag("upsert"));
    assert!(!options.flag("limit"));
    assert_eq!(options.get("limit"), Some(&Value::from(3)));
    assert!(Options::new().is_empty());
}
