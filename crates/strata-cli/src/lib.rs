//! Strata CLI library
//!
//! This module contains the core CLI logic for the Strata layout tool: read a
//! graph document, lay out every scope top-down with the selected engine and
//! write the resulting geometry.

pub mod document;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, io::Write};

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use strata::{
    layout::engines::{EngineBuilder, LayoutEngine},
    structure::BasicGraph,
};

use document::GraphDocument;

/// Run the Strata CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading and validation errors
/// - Malformed graph documents
/// - Layout errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Processing graph");

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = EngineBuilder::from_config(app_config.layout())?;
    let kind = match &args.engine {
        Some(name) => name.parse::<LayoutEngine>()?,
        None => app_config.layout().engine(),
    };

    let source = fs::read_to_string(&args.input)?;
    let mut graph = GraphDocument::from_toml(&source)?.build()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let engine = builder.build::<BasicGraph>(kind);
    for scope in graph.scopes() {
        debug!(scope:?, engine:? = kind; "Laying out scope");
        engine.layout(graph.graph_mut(), scope, &mut rng)?;
    }

    let output = graph.to_layout().to_toml()?;
    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Layout written");
        }
        None => std::io::stdout().write_all(output.as_bytes())?,
    }

    Ok(())
}
