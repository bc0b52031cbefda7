// @generated by krmgen. Do not edit by hand.
//! `Widget` resources

use serde_json::Map;
use serde_json::Value;

/// `blue-widget` from `widget.yml` (document 0)
pub fn blue_widget() -> Value {
    Value::Object(Map::from_iter([
        ("apiVersion".to_owned(), Value::String("example.com/v1alpha1".to_owned())),
        ("kind".to_owned(), Value::String("Widget".to_owned())),
        ("metadata".to_owned(), Value::Object(Map::from_iter([
            ("name".to_owned(), Value::String("blue-widget".to_owned())),
            ("namespace".to_owned(), Value::String("default".to_owned())),
        ]))),
        ("spec".to_owned(), Value::Object(Map::from_iter([
            ("size".to_owned(), Value::from(3_i64)),
            ("ratio".to_owned(), Value::from(0.5_f64)),
            ("enabled".to_owned(), Value::Bool(true)),
            ("owner".to_owned(), Value::Null),
            ("tags".to_owned(), Value::Array(vec![])),
            ("options".to_owned(), Value::Object(Map::new())),
            ("parts".to_owned(), Value::Array(vec![
                Value::Object(Map::from_iter([
                    ("name".to_owned(), Value::String("bolt".to_owned())),
                    ("count".to_owned(), Value::from(12_i64)),
                ])),
            ])),
        ]))),
    ]))
}

/// Every `Widget`, in manifest order
pub fn all() -> Vec<Value> {
    vec![
        blue_widget(),
    ]
}
