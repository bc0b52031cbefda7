//! Exit codes of the krmgen binary
//!
//! A run that skipped documents still exits with 0; the summary reports them.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Configuration error - invalid krmgen.yaml or flag values
pub const CONFIG_ERROR: i32 = 2;

/// Input error - missing input or no manifests found
pub const INPUT_ERROR: i32 = 3;

/// Helm error - chart expansion failed
pub const HELM_ERROR: i32 = 4;

/// IO error - the generated module could not be written
pub const IO_ERROR: i32 = 5;
