//! Error and warning types for code generation

use std::path::PathBuf;
use thiserror::Error;

use crate::cir::CirError;

/// Fatal error of a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Write(#[from] AssemblyWriteError),

    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Config(#[from] krmgen_core::CoreError),
}

/// The generated module could not be written
#[derive(Debug, Error)]
#[error("Failed to write generated module at {}: {source}", path.display())]
pub struct AssemblyWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl AssemblyWriteError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// A typed value that could not be turned into a literal
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize {kind}: {source}")]
    Serialize {
        kind: String,
        #[source]
        source: CirError,
    },
}

/// Emission went ahead with a lossy or untyped rendition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeWarning {
    #[error("{path}: {value} cannot be written exactly, emitted with a precision marker")]
    PrecisionDegraded { path: String, value: f64 },

    #[error("{path}: no host type entry for {type_name}, emitted through serde_json")]
    UnregisteredType { path: String, type_name: String },

    #[error("{path}: byte string is not valid base64, emitted its raw text")]
    InvalidByteString { path: String },
}

pub type Result<T> = std::result::Result<T, GenerateError>;
