//! OpenAPI Doc Preprocessor - Render-ready Swagger documents for documentation templates.
//!
//! This library takes a Swagger 2.0 document exported from API Gateway, including
//! its `x-amazon-apigateway-documentation` parts, and reshapes it so a template
//! can render it without any logic of its own.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`loader`] - Reads JSON or YAML documents from disk
//! 2. [`options`] - Spec and logo locations for a run
//! 3. [`pruner`] - Removes internal paths, `options` operations and hidden models
//! 4. [`normalizer`] - Stamps operations and splits out the body parameter
//! 5. [`tags`] - Links operations to declared and implicit tags
//! 6. [`resolver`] - Inlines `$ref`s from the same document or relative files
//! 7. [`documentation`] - Merges documentation parts into descriptions
//! 8. [`pipeline`] - Runs all passes over a copy of the input
//! 9. [`serializer`] - Serializes the result to JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_doc_preprocessor::{
//!     loader::load_document,
//!     options::PreprocessOptions,
//!     pipeline::Preprocessor,
//!     serializer::serialize_json,
//! };
//! use std::path::Path;
//!
//! let spec = load_document(Path::new("./api/swagger.json")).unwrap();
//! let options = PreprocessOptions::new()
//!     .with_spec_file("./api/swagger.json")
//!     .with_logo_file("./assets/logo.png");
//!
//! let document = Preprocessor::new(options).process(&spec).unwrap();
//! println!("{}", serialize_json(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod document;
pub mod documentation;
pub mod error;
pub mod loader;
pub mod normalizer;
pub mod options;
pub mod pipeline;
pub mod pruner;
pub mod resolver;
pub mod serializer;
pub mod tags;

pub use error::{Error, Result};
pub use options::PreprocessOptions;
pub use pipeline::{preprocess, Preprocessor};
