use crate::document::{DEFINITIONS, PATHS, TAGS};
use crate::loader::load_document;
use crate::options::PreprocessOptions;
use crate::pipeline::Preprocessor;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;

/// OpenAPI Doc Preprocessor - Turn a Swagger document with API Gateway documentation parts into template input
#[derive(Parser, Debug)]
#[command(name = "openapi-doc-preprocessor")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Swagger document (JSON or YAML)
    #[arg(value_name = "SPEC_FILE")]
    pub spec_file: PathBuf,

    /// Logo file whose base name is copied onto the output
    #[arg(short = 'l', long = "logo", value_name = "FILE")]
    pub logo_file: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.spec_file.exists() {
        anyhow::bail!("Spec file does not exist: {}", args.spec_file.display());
    }

    if !args.spec_file.is_file() {
        anyhow::bail!("Spec file is not a file: {}", args.spec_file.display());
    }

    info!("Spec file: {}", args.spec_file.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref logo) = args.logo_file {
        info!("Logo file: {}", logo.display());
    }
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

impl CliArgs {
    pub fn options(&self) -> PreprocessOptions {
        let options = PreprocessOptions::new().with_spec_file(&self.spec_file);
        match &self.logo_file {
            Some(logo) => options.with_logo_file(logo),
            None => options,
        }
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    // Step 1: Load the document
    info!("Loading {}...", args.spec_file.display());
    let spec = load_document(&args.spec_file)
        .with_context(|| format!("Failed to load spec file: {}", args.spec_file.display()))?;

    // Step 2: Preprocess
    info!("Preprocessing document...");
    let preprocessor = Preprocessor::new(args.options());
    let document = preprocessor
        .process(&spec)
        .context("Failed to preprocess document")?;

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    // Step 5: Display summary
    let count = |key: &str| -> usize {
        match document.get(key) {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    };
    info!("Summary:");
    info!("  - Paths: {}", count(PATHS));
    info!("  - Tags: {}", count(TAGS));
    info!("  - Definitions: {}", count(DEFINITIONS));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(spec_file: PathBuf) -> CliArgs {
        CliArgs {
            spec_file,
            logo_file: None,
            output_format: OutputFormat::Json,
            output_path: None,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_args_rejects_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_args_from_parsed(args_for(temp_dir.path().join("nope.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_args_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_args_from_parsed(args_for(temp_dir.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_options_from_args() {
        let mut args = args_for(PathBuf::from("api/swagger.yaml"));
        args.logo_file = Some(PathBuf::from("img/logo.png"));

        let options = args.options();

        assert_eq!(options.spec_file, Some(PathBuf::from("api/swagger.yaml")));
        assert_eq!(options.logo_name(), Some("logo.png".to_string()));
    }

    #[test]
    fn test_run_writes_yaml_output() {
        let temp_dir = TempDir::new().unwrap();
        let spec_file = temp_dir.path().join("swagger.json");
        fs::write(
            &spec_file,
            r#"{"swagger": "2.0", "paths": {"/a": {"get": {}}}, "definitions": {}}"#,
        )
        .unwrap();
        let output_path = temp_dir.path().join("out").join("doc.yaml");

        let mut args = args_for(spec_file);
        args.output_format = OutputFormat::Yaml;
        args.output_path = Some(output_path.clone());
        run(args).unwrap();

        let written: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(written["tags"][0]["name"].as_str(), Some("default"));
        assert_eq!(written["paths"]["/a"]["get"]["method"].as_str(), Some("get"));
    }

    #[test]
    fn test_run_fails_on_unparsable_spec() {
        let temp_dir = TempDir::new().unwrap();
        let spec_file = temp_dir.path().join("swagger.json");
        fs::write(&spec_file, "not json").unwrap();

        assert!(run(args_for(spec_file)).is_err());
    }
}
