//! Error types for IDL loading.
//!
//! Named `IdlError` to avoid confusion with `types::ErrorCode`, which
//! models a program's declared error codes rather than a loader failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("failed to read IDL file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse IDL JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown tag {tag:?} on field {field} of node {node}")]
    UnknownTag {
        node: String,
        field: String,
        tag: String,
    },

    #[error("unsupported feature on node {node}: {feature}")]
    Unsupported { node: String, feature: String },
}

impl IdlError {
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        IdlError::Io {
            path: path.into(),
            source,
        }
    }
}
