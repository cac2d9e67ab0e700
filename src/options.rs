//! Configuration for a preprocessor run.

use log::warn;
use std::path::{Path, PathBuf};

/// Options recognized by the preprocessor.
///
/// `spec_file` is where the document was loaded from. Relative `$ref`s are
/// resolved against its directory and it is stamped onto the output as
/// `x-spec-path`. `logo_file` only contributes its base name to the output.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    pub spec_file: Option<PathBuf>,
    pub logo_file: Option<PathBuf>,
}

impl PreprocessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec_file = Some(path.into());
        self
    }

    pub fn with_logo_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_file = Some(path.into());
        self
    }

    /// The configured spec location, or the current working directory when unset.
    ///
    /// A missing value is not an error; it is reported as a warning.
    pub fn spec_location(&self) -> PathBuf {
        match &self.spec_file {
            Some(path) => path.clone(),
            None => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                warn!(
                    "no spec file location configured, defaulting to the current directory: {}",
                    cwd.display()
                );
                cwd
            }
        }
    }

    /// Base name of the logo file, if one is configured.
    pub fn logo_name(&self) -> Option<String> {
        self.logo_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Directory that relative references are resolved against.
pub fn base_directory(spec_location: &Path) -> PathBuf {
    match spec_location.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
