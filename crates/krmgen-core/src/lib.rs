//! krmgen Core - manifest documents and resource classification
//!
//! This crate provides the front half of the generation pipeline:
//! - `Documents`: lazy splitting of multi-document manifests
//! - `Tree`: the generic, order-preserving resource representation
//! - `SchemaRegistry`: typed and generic decoding backed by `k8s-openapi`
//! - `Classifier`: routing each document down the typed or schema-less path
//! - `GenerateConfig`: the run configuration

pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod registry;
pub mod tree;

pub use classify::{Classifier, Resource, Route, UnstructuredResource};
pub use config::{DEFAULT_TYPED_KINDS, GenerateConfig};
pub use document::{Document, Documents, split_bytes, split_documents};
pub use error::{CoreError, DecodeError, DocumentError, SchemaDecodeError, SplitError};
pub use kube::core::GroupVersionKind;
pub use registry::{
    KubeRegistry, RegisteredKind, SchemaRegistry, TypedResource, gvk_of, registered_kind,
};
pub use tree::{Number, Tree};
