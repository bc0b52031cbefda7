//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Manifest bytes that cannot be split into documents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("manifest is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// A document fragment that is not well-formed structured text
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document is not a mapping (found {found})")]
    NotAnObject { found: &'static str },

    #[error("Object '{field}' is missing or empty")]
    MissingField { field: &'static str },

    #[error("non-string key {key} at {path}")]
    NonStringKey { key: String, path: String },
}

/// A document whose content does not match the schema of its kind
#[derive(Error, Debug)]
pub enum SchemaDecodeError {
    #[error("kind '{kind}' has no registered schema")]
    Unregistered { kind: String },

    #[error("{kind} does not match its schema: {source}")]
    Mismatch {
        kind: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{kind} has fields unknown to its schema: {}", fields.join(", "))]
    UnknownFields { kind: String, fields: Vec<String> },
}

impl SchemaDecodeError {
    /// Kind of the rejected document
    pub fn kind(&self) -> &str {
        match self {
            Self::Unregistered { kind } | Self::Mismatch { kind, .. } | Self::UnknownFields { kind, .. } => {
                kind
            }
        }
    }
}

/// Failure of a single document; the pipeline skips the document and moves on
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaDecodeError),
}

impl DocumentError {
    /// Kind of the document, when it got far enough to have one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Decode(_) => None,
            Self::Schema(e) => Some(e.kind()),
        }
    }
}
