//! OpenAPI Doc Preprocessor - Command-line tool that prepares Swagger documents for rendering.
//!
//! This binary reads a Swagger document, runs the preprocessing pipeline over it
//! and writes the render-ready result for a documentation template.
//!
//! # Usage
//!
//! ```bash
//! openapi-doc-preprocessor [OPTIONS] <SPEC_FILE>
//! ```
//!
//! # Examples
//!
//! Write the render-ready document as JSON:
//! ```bash
//! openapi-doc-preprocessor ./api/swagger.json -o build/api.json
//! ```
//!
//! Include a logo and write YAML:
//! ```bash
//! openapi-doc-preprocessor ./api/swagger.yaml -l assets/logo.png -f yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-doc-preprocessor ./api/swagger.json -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_doc_preprocessor::cli;

fn main() -> Result<()> {
    // Parse once to learn the verbosity, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Doc Preprocessor starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Preprocessing completed successfully");

    Ok(())
}
