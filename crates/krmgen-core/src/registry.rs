//! Typed and generic decoding of resource documents
//!
//! [`KubeRegistry`] knows the `k8s-openapi` types krmgen can reconstruct as
//! struct literals. Every other kind is only ever decoded generically.

use std::any::TypeId;

use k8s_openapi::api::apps::v1 as apps;
use k8s_openapi::api::core::v1 as core_v1;
use k8s_openapi::api::rbac::v1 as rbac;
use k8s_openapi::api::scheduling::v1 as scheduling;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{NamespaceResourceScope, Resource as _};
use kube::core::{GroupVersionKind, TypeMeta};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{DecodeError, SchemaDecodeError};
use crate::tree::Tree;

/// Decoders for resource documents
pub trait SchemaRegistry {
    /// Decode a document into its registered typed form
    fn decode(&self, text: &str) -> Result<(TypedResource, GroupVersionKind), SchemaDecodeError>;

    /// Decode a document into a generic tree and read its GVK
    fn decode_generic(&self, text: &str) -> Result<(Tree, GroupVersionKind), DecodeError>;

    /// Whether `kind` has a typed decoder
    fn is_registered(&self, kind: &str) -> bool;

    /// All kinds with a typed decoder
    fn registered_kinds(&self) -> &[&'static str];
}

/// A kind [`KubeRegistry`] decodes into a typed schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredKind {
    pub gvk: GroupVersionKind,
    pub namespaced: bool,
}

macro_rules! typed_resources {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        /// A resource decoded into its `k8s-openapi` type
        #[derive(Debug, Clone, PartialEq)]
        pub enum TypedResource {
            $($variant($ty),)+
        }

        impl TypedResource {
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty>::KIND,)+
                }
            }

            pub fn api_version(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty>::API_VERSION,)+
                }
            }

            pub fn gvk(&self) -> GroupVersionKind {
                match self {
                    $(Self::$variant(_) => GroupVersionKind::gvk(<$ty>::GROUP, <$ty>::VERSION, <$ty>::KIND),)+
                }
            }

            pub fn metadata(&self) -> &ObjectMeta {
                match self {
                    $(Self::$variant(r) => &r.metadata,)+
                }
            }

            pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
                match self {
                    $(Self::$variant(r) => &mut r.metadata,)+
                }
            }

            /// Whether the kind lives inside a namespace
            pub fn is_namespaced(&self) -> bool {
                match self {
                    $(Self::$variant(_) => {
                        TypeId::of::<<$ty as k8s_openapi::Resource>::Scope>()
                            == TypeId::of::<NamespaceResourceScope>()
                    })+
                }
            }
        }

        impl Serialize for TypedResource {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(r) => r.serialize(serializer),)+
                }
            }
        }

        const REGISTERED_KINDS: &[&str] = &[$(<$ty>::KIND,)+];

        /// Group, version and scope of a registered kind
        pub fn registered_kind(kind: &str) -> Option<RegisteredKind> {
            $(
                if kind == <$ty>::KIND {
                    return Some(RegisteredKind {
                        gvk: GroupVersionKind::gvk(<$ty>::GROUP, <$ty>::VERSION, <$ty>::KIND),
                        namespaced: TypeId::of::<<$ty as k8s_openapi::Resource>::Scope>()
                            == TypeId::of::<NamespaceResourceScope>(),
                    });
                }
            )+
            None
        }

        fn decode_as(kind: &str, text: &str) -> Option<Result<TypedResource, serde_yaml::Error>> {
            $(
                if kind == <$ty>::KIND {
                    return Some(serde_yaml::from_str::<$ty>(text).map(TypedResource::$variant));
                }
            )+
            None
        }
    };
}

typed_resources! {
    Deployment => apps::Deployment,
    StatefulSet => apps::StatefulSet,
    Service => core_v1::Service,
    Secret => core_v1::Secret,
    ConfigMap => core_v1::ConfigMap,
    ServiceAccount => core_v1::ServiceAccount,
    PersistentVolumeClaim => core_v1::PersistentVolumeClaim,
    Role => rbac::Role,
    RoleBinding => rbac::RoleBinding,
    ClusterRole => rbac::ClusterRole,
    ClusterRoleBinding => rbac::ClusterRoleBinding,
    PriorityClass => scheduling::PriorityClass,
}

/// Read the GVK of a generic tree
///
/// `apiVersion` is split on its first `/`; without one the group is the core group.
pub fn gvk_of(tree: &Tree) -> Result<GroupVersionKind, DecodeError> {
    let field = |name: &'static str| {
        tree.get(name)
            .and_then(Tree::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(DecodeError::MissingField { field: name })
    };
    let api_version = field("apiVersion")?;
    let kind = field("kind")?;
    let (group, version) = api_version.split_once('/').unwrap_or(("", api_version));
    Ok(GroupVersionKind::gvk(group, version, kind))
}

/// Registry backed by `k8s-openapi`
#[derive(Debug, Clone, Default)]
pub struct KubeRegistry {
    strict: bool,
}

impl KubeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject documents carrying fields their typed schema does not know
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl SchemaRegistry for KubeRegistry {
    fn decode(&self, text: &str) -> Result<(TypedResource, GroupVersionKind), SchemaDecodeError> {
        let type_meta: TypeMeta =
            serde_yaml::from_str(text).map_err(|source| SchemaDecodeError::Mismatch {
                kind: String::new(),
                source,
            })?;
        let kind = type_meta.kind;

        let typed = match decode_as(&kind, text) {
            Some(Ok(typed)) => typed,
            Some(Err(source)) => return Err(SchemaDecodeError::Mismatch { kind, source }),
            None => return Err(SchemaDecodeError::Unregistered { kind }),
        };

        if self.strict {
            let original: JsonValue =
                serde_yaml::from_str(text).map_err(|source| SchemaDecodeError::Mismatch {
                    kind: kind.clone(),
                    source,
                })?;
            let decoded = serde_json::to_value(&typed).unwrap_or(JsonValue::Null);
            let fields = unknown_fields(&original, &decoded);
            if !fields.is_empty() {
                return Err(SchemaDecodeError::UnknownFields { kind, fields });
            }
        }

        let gvk = typed.gvk();
        Ok((typed, gvk))
    }

    fn decode_generic(&self, text: &str) -> Result<(Tree, GroupVersionKind), DecodeError> {
        let tree = Tree::from_yaml_str(text)?;
        if tree.as_map().is_none() {
            return Err(DecodeError::NotAnObject {
                found: tree.type_name(),
            });
        }
        let gvk = gvk_of(&tree)?;
        Ok((tree, gvk))
    }

    fn is_registered(&self, kind: &str) -> bool {
        REGISTERED_KINDS.contains(&kind)
    }

    fn registered_kinds(&self) -> &[&'static str] {
        REGISTERED_KINDS
    }
}

/// Dotted paths present in `original` but lost by the typed decode
///
/// Null values are skipped since the typed form drops them anyway.
pub fn unknown_fields(original: &JsonValue, decoded: &JsonValue) -> Vec<String> {
    let mut out = Vec::new();
    collect_unknown(original, decoded, &mut Vec::new(), &mut out);
    out
}

fn collect_unknown(
    original: &JsonValue,
    decoded: &JsonValue,
    path: &mut Vec<String>,
    out: &mut Vec<String>,
) {
    match (original, decoded) {
        (JsonValue::Object(orig), JsonValue::Object(dec)) => {
            for (key, value) in orig {
                if value.is_null() {
                    continue;
                }
                path.push(key.clone());
                match dec.get(key) {
                    Some(d) => collect_unknown(value, d, path, out),
                    None => out.push(path.join(".")),
                }
                path.pop();
            }
        }
        (JsonValue::Array(orig), JsonValue::Array(dec)) => {
            for (i, (o, d)) in orig.iter().zip(dec).enumerate() {
                path.push(i.to_string());
                collect_unknown(o, d, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}
