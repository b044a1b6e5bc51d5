use std::path::PathBuf;
use thiserror::Error;

/// Problems with the planning document, detected before any variable exists.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read planning document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed planning document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required data: {0}")]
    Missing(String),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("unknown {kind} '{name}' referenced in {context}")]
    UnknownReference {
        kind: &'static str,
        name: String,
        context: String,
    },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("scenario probabilities sum to {0}, expected 1")]
    ProbabilityMass(f64),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
