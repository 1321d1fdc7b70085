use serde_json::{json, Map, Value};
use trellis_view::{view, View};

#[test]
fn subscript_and_accessor_forms_agree() {
    let view = view! { "foo": "bar", "bar": { "bat": "baz" } };
    assert_eq!(view.get("foo"), "bar");
    assert_eq!(view["foo"], json!("bar"));
    assert_eq!(view.get("bar"), view!{ "bat": "baz" });
    assert_eq!(view["bar"], json!({ "bat": "baz" }));
}

#[test]
fn missing_keys_read_back_as_empty_views() {
    let view = view! { "foo": "bar", "bar": { "bat": "baz" } };

    assert!(view.get("baz").is_empty());
    assert_eq!(view.get("baz"), View::new());
    assert!(view.get("baz").get("bat").is_empty());
    assert_eq!(view["baz"], json!({}));

    // chains of arbitrary depth never fail
    assert!(view.get("a").get("b").get("c").get("d").is_empty());
}

#[test]
fn nested_objects_wrap_on_read_without_mutating_storage() {
    let mut view = View::new();
    view.set("a", json!({ "b": 1 }));

    let nested = view.get("a");
    assert_eq!(nested.get("b"), json!(1));

    // the read did not rewrite the stored value
    assert_eq!(view["a"], json!({ "b": 1 }));
}

#[test]
fn set_overwrites() {
    let mut view = View::new();
    view.set("count", 1);
    assert_eq!(view["count"], json!(1));
    view.set("count", 2);
    assert_eq!(view["count"], json!(2));
    assert_eq!(view.len(), 1);
}

#[test]
fn indexed_writes_insert() {
    let mut view = View::new();
    view["greeting"] = json!("hello");
    assert_eq!(view.get("greeting"), "hello");
}

#[test]
fn merge_is_left_seeded_and_right_biased() {
    let a = view! { "foo": "bar", "bar": { "bat": "baz" } };
    let b = view! { "bar": "baz" };

    let merged = a.merge(&b);
    assert_eq!(merged, view! { "foo": "bar", "bar": "baz" });

    // neither operand was mutated
    assert_eq!(a, view! { "foo": "bar", "bar": { "bat": "baz" } });
    assert_eq!(b, view! { "bar": "baz" });
}

#[test]
fn merge_all_applies_others_in_order() {
    let a = view! { "x": 1 };
    let b = view! { "x": 2, "y": 2 };
    let c = view! { "y": 3 };

    assert_eq!(a.merge_all([&b, &c]), view! { "x": 2, "y": 3 });
    assert_eq!(a.merge_all([&c, &b]), view! { "x": 2, "y": 2 });
}

#[test]
fn add_operator_merges() {
    let a = view! { "foo": "bar" };
    let b = view! { "bar": "baz" };
    assert_eq!(&a + &b, view! { "foo": "bar", "bar": "baz" });

    // a plain map is accepted on the right
    let mut map = Map::new();
    map.insert("bar".into(), json!("baz"));
    assert_eq!(a.clone() + map, view! { "foo": "bar", "bar": "baz" });
}

#[test]
fn scalar_operands_contribute_nothing() {
    let a = view! { "foo": "bar" };
    let scalar = View::from(json!("just a string"));
    assert_eq!(a.merge(&scalar), a);
    assert_eq!(scalar.merge(&a), a);
}

#[test]
fn builder_and_iteration() {
    let view = View::new().with("a", 1).with("b", "two");
    assert!(view.contains_key("a"));
    assert_eq!(view.len(), 2);

    let keys: Vec<&String> = view.iter().map(|(key, _)| key).collect();
    assert!(keys.contains(&&"a".to_string()));
    assert!(keys.contains(&&"b".to_string()));
}

#[test]
fn serializes_transparently() {
    let view = view! { "foo": "bar" };
    assert_eq!(
        serde_json::to_value(&view).unwrap(),
        json!({ "foo": "bar" })
    );
    assert_eq!(view.to_string(), r#"{"foo":"bar"}"#);

    let back: View = serde_json::from_str(r#"{"foo":"bar"}"#).unwrap();
    assert_eq!(back, view);
}

#[test]
fn structs_store_as_objects_and_wrap_on_read() {
    #[derive(serde::Serialize)]
    struct User {
        name: &'static str,
    }

    let mut view = View::new();
    view.set("user", User { name: "al" });
    assert_eq!(view.get("user").get("name"), "al");
}

#[test]
fn from_value_and_into_value_round_trip() {
    let value = json!({ "nested": { "deep": true } });
    let view = View::from(value.clone());
    assert_eq!(view.get("nested").get("deep"), json!(true));
    assert_eq!(Value::from(view), value);
}
