use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {msg}")]
    ParseError {
        msg:  String,
        line: usize,
    },

    #[error("Event {event} references unknown descriptor {key}")]
    UnresolvedReference {
        key:   String,
        event: String,
    },

    #[error("Unsupported type {type_} for preference {name} at line {line}")]
    UnsupportedType {
        type_: String,
        name:  String,
        line:  usize,
    },

    #[error("Rewrite error: {0}")]
    RewriteError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Generated output is out of date: {}", .0.display())]
    StaleOutput(PathBuf),
}
