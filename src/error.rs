use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    /// No annotation is registered for a (method, canonical path) pair.
    NoDocumentation { method: String, path: String },
    /// None of the candidate files for a fragment exist.
    NotFound {
        section: String,
        candidates: Vec<PathBuf>,
    },
    /// A fragment file was located but could not be read.
    NotReadable {
        file: PathBuf,
        source: std::io::Error,
    },
    /// The renderer rejected the assembled document.
    Render(String),
    InvalidConfig(String),
    IoError(std::io::Error),
    SerializationError(String),
}

impl Error {
    /// Whether this is the recoverable missing-annotation case.
    pub fn is_no_documentation(&self) -> bool {
        matches!(self, Error::NoDocumentation { .. })
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NoDocumentation { method, path } => write!(
                f,
                "No documentation exists for HTTP API method and path: {} {}",
                method, path
            ),
            Error::NotFound { section, candidates } => {
                let tried: Vec<String> = candidates
                    .iter()
                    .map(|c| c.display().to_string())
                    .collect();
                write!(
                    f,
                    "Failed to locate documentation file '{}' (tried: {})",
                    section,
                    tried.join(", ")
                )
            }
            Error::NotReadable { file, source } => write!(
                f,
                "Failed to load documentation file {}: {}",
                file.display(),
                source
            ),
            Error::Render(msg) => write!(f, "Failed to render documentation: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotReadable { source, .. } => Some(source),
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_documentation_is_recoverable() {
        let err = Error::NoDocumentation {
            method: "get".to_string(),
            path: "/i/{identity}".to_string(),
        };
        assert!(err.is_no_documentation());
        assert!(err.to_string().contains("get /i/{identity}"));
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let err = Error::NotFound {
            section: "limits.md".to_string(),
            candidates: vec![PathBuf::from("a/limits.md"), PathBuf::from("b/limits.md")],
        };
        assert!(!err.is_no_documentation());
        let msg = err.to_string();
        assert!(msg.contains("limits.md"));
        assert!(msg.contains("a/limits.md, b/limits.md"));
    }

    #[test]
    fn test_not_readable_has_source() {
        use std::error::Error as _;
        let err = Error::NotReadable {
            file: PathBuf::from("docs/base.raml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("docs/base.raml"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [ a list").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::SerializationError(_)));
    }
}
