use std::path::PathBuf;

/// Result type alias for the preprocessor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the preprocessor
#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    UnresolvedReference { reference: String, message: String },
    UnsupportedReference(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "IO error on {}: {}", path.display(), source),
            Error::Parse { path, message } => {
                write!(f, "failed to parse {}: {}", path.display(), message)
            }
            Error::UnresolvedReference { reference, message } => {
                write!(f, "cannot resolve reference '{}': {}", reference, message)
            }
            Error::UnsupportedReference(reference) => {
                write!(f, "remote references are not supported: '{}'", reference)
            }
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}
