//! Errors reported by the CLI.

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use strata::StrataError;

/// Everything that can stop a CLI run.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(strata::io))]
    Io(#[from] io::Error),

    #[error("Missing configuration file: {}", .0.display())]
    #[diagnostic(code(strata::config::missing))]
    MissingConfig(PathBuf),

    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    #[diagnostic(
        code(strata::config::parse),
        help("see the [layout] section of the README for the accepted keys")
    )]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to parse graph document: {0}")]
    #[diagnostic(code(strata::document::parse))]
    Document(#[from] toml::de::Error),

    #[error("Failed to encode layout: {0}")]
    #[diagnostic(code(strata::document::encode))]
    Encode(#[from] toml::ser::Error),

    #[error("Node `{0}` is declared more than once")]
    #[diagnostic(code(strata::document::duplicate_node))]
    DuplicateNode(String),

    #[error("Unknown node `{id}` referenced as {role}")]
    #[diagnostic(
        code(strata::document::unknown_node),
        help("declare the node in a [[nodes]] table")
    )]
    UnknownNode { id: String, role: &'static str },

    #[error("Parent `{parent}` of node `{node}` would create a containment cycle")]
    #[diagnostic(code(strata::document::parent_cycle))]
    ParentCycle { node: String, parent: String },

    #[error("Layout failed: {0}")]
    #[diagnostic(code(strata::layout))]
    Layout(#[from] StrataError),
}

impl From<strata::ConfigError> for CliError {
    fn from(err: strata::ConfigError) -> Self {
        Self::Layout(err.into())
    }
}
