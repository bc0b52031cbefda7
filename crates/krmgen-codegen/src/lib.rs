//! krmgen Codegen - Kubernetes manifests as Rust source
//!
//! This crate turns classified resources into generated code:
//! - `cir`: a serde serializer capturing typed values as a neutral tree
//! - `typed`: `k8s-openapi` struct literals with zero-value elision
//! - `unstructured`: `serde_json::Value` literals for schema-less kinds
//! - `assembler`: per-kind files, `mod.rs` index and the atomic write
//! - `pipeline`: the end-to-end `run`

pub mod assembler;
pub mod cir;
pub mod error;
pub mod literal;
pub mod naming;
pub mod pipeline;
pub mod schema;
pub mod typed;
pub mod unstructured;

pub use assembler::{Accumulator, Bundle, EncodedResource, GeneratedFile, SourceRef};
pub use cir::{Cir, CirError, CirSerializer, to_cir};
pub use error::{AssemblyWriteError, EncodeError, EncodeWarning, GenerateError};
pub use literal::{Literal, PRECISION_MARKER};
pub use pipeline::{
    KindSummary, RunOutput, RunSummary, SkippedDocument, UnreadableFile, WarningRecord, run,
    run_with_registry,
};
pub use typed::{encode_typed, elide};
pub use unstructured::encode_unstructured;
