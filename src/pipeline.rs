//! The preprocessing pipeline.
//!
//! [`Preprocessor::process`] borrows the caller's document and returns a new,
//! independently owned one ready for the template. The passes run in this
//! order:
//!
//! 1. copy the input and stamp `x-spec-path` (and `logo` when configured);
//! 2. early pruning: drop `/sentry`, so it never produces a tag;
//! 3. normalization of paths and operations, linking tags as it goes;
//! 4. reference resolution;
//! 5. late pruning: drop `options` operations and hidden definitions,
//!    including any that resolution pulled in;
//! 6. documentation merge;
//! 7. the tag graph is written out as `tags`.
//!
//! A resolver failure aborts the run and no document is returned.

use crate::document::{LOGO, SPEC_PATH};
use crate::documentation::merge_documentation;
use crate::error::Result;
use crate::normalizer::normalize;
use crate::options::{base_directory, PreprocessOptions};
use crate::pruner::{prune_early, prune_late};
use crate::resolver::{FileReferenceResolver, ReferenceResolver};
use log::{debug, info};
use serde_json::Value;

/// Turns a raw Swagger document into a render-ready one.
pub struct Preprocessor<R = FileReferenceResolver> {
    options: PreprocessOptions,
    resolver: R,
}

impl Preprocessor<FileReferenceResolver> {
    /// Creates a preprocessor that resolves references from disk.
    pub fn new(options: PreprocessOptions) -> Self {
        Self::with_resolver(options, FileReferenceResolver::new())
    }
}

impl<R: ReferenceResolver> Preprocessor<R> {
    /// Creates a preprocessor with a custom reference resolver.
    pub fn with_resolver(options: PreprocessOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// Runs every pass over a copy of `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error if reference resolution fails.
    pub fn process(&self, spec: &Value) -> Result<Value> {
        let spec_location = self.options.spec_location();
        let mut document = spec.clone();

        if let Some(root) = document.as_object_mut() {
            root.insert(
                SPEC_PATH.to_string(),
                Value::String(spec_location.display().to_string()),
            );
            if let Some(logo) = self.options.logo_name() {
                debug!("Using logo {}", logo);
                root.insert(LOGO.to_string(), Value::String(logo));
            }
        }

        prune_early(&mut document);
        let tags = normalize(&mut document);
        debug!("Linked operations into {} tag(s)", tags.len());

        let mut document = self
            .resolver
            .resolve(&base_directory(&spec_location), document)?;

        prune_late(&mut document);
        let merged = merge_documentation(&mut document);
        debug!("Applied {} documentation part(s)", merged);

        tags.attach(&mut document);
        info!("Preprocessed {}", spec_location.display());
        Ok(document)
    }
}

/// Preprocesses `spec` with the default file-based resolver.
pub fn preprocess(options: PreprocessOptions, spec: &Value) -> Result<Value> {
    Preprocessor::new(options).process(spec)
}
