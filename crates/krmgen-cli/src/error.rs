//! CLI error types with exit code handling

use krmgen_codegen::GenerateError;
use krmgen_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration file or flags are invalid
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(krmgen::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Input path missing or holding no manifests
    #[error("Input error: {message}")]
    #[diagnostic(code(krmgen::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// `helm template` could not expand the chart
    #[error("Helm error: {message}")]
    #[diagnostic(code(krmgen::cli::helm))]
    Helm {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (write failure, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(krmgen::cli::io))]
    Io { message: String },

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(krmgen::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Helm { .. } => exit_codes::HELM_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a helm error
    pub fn helm(message: impl Into<String>, help: Option<String>) -> Self {
        Self::Helm {
            message: message.into(),
            help,
        }
    }
}

impl From<GenerateError> for CliError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Write(e) => CliError::Io {
                message: e.to_string(),
            },
            GenerateError::InputNotFound(path) => CliError::Input {
                message: format!("{} does not exist", path.display()),
                help: None,
            },
            GenerateError::Config(e) => e.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = match err {
            CoreError::InvalidConfig { message } => message,
            other => other.to_string(),
        };
        CliError::Config {
            message,
            help: Some("Check krmgen.yaml and the command line flags".to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other {
            message: format!("Failed to serialize output: {err}"),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
