//! CLI commands

pub mod generate;
pub mod kinds;
