//! Schema-less resources as `serde_json::Value` expressions
//!
//! Only the generic constructors are used, so the output compiles against any
//! `serde_json` and needs no knowledge of the resource's schema. Nothing is
//! elided: empty containers and nulls are reproduced as written.

use krmgen_core::{Number, Tree};
use serde_json::Value as JsonValue;

use crate::error::EncodeWarning;
use crate::literal::{EmitState, Expr, Literal, PRECISION_MARKER, float_literal, owned_str, quote_str};

const SERDE_JSON: &str = "serde_json";

/// Encode a generic tree as a `serde_json::Value` expression
pub fn encode_unstructured(tree: &Tree) -> Literal {
    let mut state = EmitState::new();
    let expr = tree_expr(tree, &mut state);
    state.finish(&expr)
}

/// Expression for a tree, recording imports and warnings in `state`
pub fn tree_expr(tree: &Tree, state: &mut EmitState) -> Expr {
    state.import(SERDE_JSON, "Value");
    match tree {
        Tree::Null => Expr::atom("Value::Null"),
        Tree::Bool(b) => Expr::atom(format!("Value::Bool({b})")),
        Tree::Number(Number::Int(i)) => Expr::atom(format!("Value::from({i}_i64)")),
        Tree::Number(Number::UInt(u)) => Expr::atom(format!("Value::from({u}_u64)")),
        Tree::Number(Number::Float(f)) => match float_literal(*f) {
            Some(literal) => Expr::atom(format!("Value::from({literal})")),
            _ => {
                state.warn(EncodeWarning::PrecisionDegraded {
                    path: state.path(),
                    value: *f,
                });
                // serde_json has no representation for NaN or infinities
                Expr::atom(format!("Value::Null {PRECISION_MARKER}"))
            }
        },
        Tree::String(s) => Expr::atom(format!("Value::String({})", owned_str(s))),
        Tree::Seq(items) => {
            let items = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    state.push(i.to_string());
                    let expr = tree_expr(item, state);
                    state.pop();
                    expr
                })
                .collect();
            Expr::block("Value::Array(vec![", items, "])")
        }
        Tree::Map(map) => {
            state.import(SERDE_JSON, "Map");
            if map.is_empty() {
                return Expr::atom("Value::Object(Map::new())");
            }
            let entries = map
                .iter()
                .map(|(key, value)| {
                    state.push(key.clone());
                    let expr = tree_expr(value, state);
                    state.pop();
                    Expr::wrap(format!("({}.to_owned(), ", quote_str(key)), expr, ")")
                })
                .collect();
            Expr::block("Value::Object(Map::from_iter([", entries, "]))")
        }
    }
}

/// Expression for a JSON value
pub fn json_expr(value: &JsonValue, state: &mut EmitState) -> Expr {
    tree_expr(&Tree::from_json(value.clone()), state)
}
