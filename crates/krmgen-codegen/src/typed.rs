//! Typed resources as `k8s-openapi` struct literals
//!
//! Encoding runs in three steps:
//!
//! 1. the resource is serialized into a [`Cir`] tree,
//! 2. optional fields holding a zero value are elided,
//! 3. the remaining tree is emitted as a struct literal, with
//!    `..Default::default()` filling in every elided field.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use krmgen_core::TypedResource;

use crate::cir::{Cir, to_cir};
use crate::error::{EncodeError, EncodeWarning};
use crate::literal::{
    EmitState, Expr, Literal, degraded_float, float_literal, owned_str, quote_bytes, quote_str,
};
use crate::schema::{
    CRATE_ROOT, FieldHint, HOST_TYPES, INTSTR, META, NEWTYPES, RESOURCE, field_hint, rust_field_ident,
};
use crate::unstructured::json_expr;

const STD_COLLECTIONS: &str = "std::collections";

/// Encode a typed resource as a struct literal
pub fn encode_typed(resource: &TypedResource) -> Result<Literal, EncodeError> {
    let cir = to_cir(resource).map_err(|source| EncodeError::Serialize {
        kind: resource.kind().to_string(),
        source,
    })?;
    Ok(encode_cir(elide(cir)))
}

/// Emit an already elided CIR tree
pub fn encode_cir(cir: Cir) -> Literal {
    let mut state = EmitState::new();
    let expr = emit(&cir, None, &mut state);
    state.finish(&expr)
}

/// Drop optional record fields that hold a zero value
///
/// Required fields and records of unknown shape are left untouched.
pub fn elide(cir: Cir) -> Cir {
    match cir {
        Cir::Record { type_name, fields } => {
            let host = HOST_TYPES.get(type_name);
            let fields = fields
                .into_iter()
                .map(|(name, value)| (name, elide(value)))
                .filter(|(name, value)| match host {
                    Some(host) => host.is_required(name) || !value.is_zero(),
                    None => true,
                })
                .collect();
            Cir::Record { type_name, fields }
        }
        Cir::Seq(items) => Cir::Seq(items.into_iter().map(elide).collect()),
        Cir::Map(entries) => Cir::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, elide(value)))
                .collect(),
        ),
        Cir::Newtype { type_name, value } => Cir::Newtype {
            type_name,
            value: Box::new(elide(*value)),
        },
        scalar => scalar,
    }
}

fn emit(cir: &Cir, hint: Option<FieldHint>, state: &mut EmitState) -> Expr {
    match cir {
        Cir::Record { type_name, fields } => record(*type_name, fields, state),
        Cir::Newtype { type_name, value } => newtype(*type_name, value, state),
        Cir::Seq(items) => {
            let items = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    state.push(i.to_string());
                    let expr = emit(item, None, state);
                    state.pop();
                    expr
                })
                .collect();
            Expr::block("vec![", items, "]")
        }
        Cir::Map(entries) => map(entries, hint, state),
        Cir::String(s) => match hint {
            Some(FieldHint::IntOrString) => {
                state.import(INTSTR, "IntOrString");
                Expr::atom(format!("IntOrString::String({})", owned_str(s)))
            }
            Some(FieldHint::ByteString) => byte_string(s, state),
            _ => Expr::atom(owned_str(s)),
        },
        Cir::Int(i) => match hint {
            Some(FieldHint::IntOrString) => {
                state.import(INTSTR, "IntOrString");
                Expr::atom(format!("IntOrString::Int({i})"))
            }
            _ => Expr::atom(i.to_string()),
        },
        Cir::UInt(u) => Expr::atom(u.to_string()),
        Cir::Float(f) => match float_literal(*f) {
            Some(literal) => Expr::atom(literal),
            None => {
                state.warn(EncodeWarning::PrecisionDegraded {
                    path: state.path(),
                    value: *f,
                });
                Expr::atom(degraded_float(*f))
            }
        },
        Cir::Bool(b) => Expr::atom(b.to_string()),
        Cir::Null => Expr::atom("Default::default()"),
        Cir::Bytes(bytes) => Expr::atom(format!("{}.to_vec()", quote_bytes(bytes))),
    }
}

fn record(type_name: &'static str, fields: &[(&'static str, Cir)], state: &mut EmitState) -> Expr {
    let Some(host) = HOST_TYPES.get(type_name) else {
        return untyped_record(type_name, fields, state);
    };
    state.import(host.module, type_name);

    let items = fields
        .iter()
        .filter(|(name, _)| !(host.resource && matches!(*name, "apiVersion" | "kind")))
        .map(|(name, value)| {
            state.push(*name);
            let expr = emit(value, field_hint(type_name, name), state);
            state.pop();

            let ident = rust_field_ident(name);
            if host.is_required(name) {
                Expr::wrap(format!("{ident}: "), expr, "")
            } else {
                Expr::wrap(format!("{ident}: Some("), expr, ")")
            }
        })
        .collect();

    Expr::Block {
        open: format!("{type_name} {{"),
        items,
        rest: Some("..Default::default()".to_string()),
        close: "}".to_string(),
    }
}

/// Records missing from the host table still round-trip through their JSON form
fn untyped_record(type_name: &str, fields: &[(&'static str, Cir)], state: &mut EmitState) -> Expr {
    state.warn(EncodeWarning::UnregisteredType {
        path: state.path(),
        type_name: type_name.to_string(),
    });
    let json = Cir::Record {
        type_name: "",
        fields: fields.to_vec(),
    }
    .to_json();
    Expr::wrap(
        "::serde_json::from_value(",
        json_expr(&json, state),
        format!(").expect({})", quote_str(&format!("valid {type_name}"))),
    )
}

fn newtype(type_name: &'static str, value: &Cir, state: &mut EmitState) -> Expr {
    match (type_name, value) {
        ("ByteString", Cir::String(s)) => byte_string(s, state),
        ("Quantity", Cir::String(s)) => {
            state.import(RESOURCE, "Quantity");
            Expr::atom(format!("Quantity({})", owned_str(s)))
        }
        ("Time" | "MicroTime", Cir::String(s)) => {
            state.import(META, type_name);
            Expr::atom(format!(
                "{type_name}({}.parse().expect(\"valid RFC 3339 timestamp\"))",
                quote_str(s)
            ))
        }
        ("FieldsV1", inner) => {
            state.import(META, "FieldsV1");
            Expr::wrap("FieldsV1(", json_expr(&inner.to_json(), state), ")")
        }
        _ => match NEWTYPES.get(type_name) {
            Some(module) => {
                state.import(module, type_name);
                Expr::wrap(format!("{type_name}("), emit(value, None, state), ")")
            }
            None => {
                state.warn(EncodeWarning::UnregisteredType {
                    path: state.path(),
                    type_name: type_name.to_string(),
                });
                emit(value, None, state)
            }
        },
    }
}

fn map(entries: &[(String, Cir)], hint: Option<FieldHint>, state: &mut EmitState) -> Expr {
    state.import(STD_COLLECTIONS, "BTreeMap");
    if entries.is_empty() {
        return Expr::atom("BTreeMap::new()");
    }
    let value_hint = match hint {
        Some(FieldHint::ByteStringMap) => Some(FieldHint::ByteString),
        _ => None,
    };
    let items = entries
        .iter()
        .map(|(key, value)| {
            state.push(key.clone());
            let expr = emit(value, value_hint, state);
            state.pop();
            Expr::wrap(format!("({}, ", owned_str(key)), expr, ")")
        })
        .collect();
    Expr::block("BTreeMap::from([", items, "])")
}

/// `ByteString` from its base64 wire form
fn byte_string(encoded: &str, state: &mut EmitState) -> Expr {
    state.import(CRATE_ROOT, "ByteString");
    match STANDARD.decode(encoded) {
        Ok(bytes) => Expr::atom(format!("ByteString({}.to_vec())", quote_bytes(&bytes))),
        Err(_) => {
            state.warn(EncodeWarning::InvalidByteString { path: state.path() });
            Expr::atom(format!("ByteString({}.as_bytes().to_vec())", quote_str(encoded)))
        }
    }
}
