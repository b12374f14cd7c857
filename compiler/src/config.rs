//! Generator settings.
//!
//! Every fixed assumption the parsers make about their inputs lives here, so a change in
//! the upstream file layout is a config edit rather than a code change. Settings are read
//! from an optional JSON file; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GenError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lines of license comment at the top of the descriptor source.
    pub descriptor_header_lines: usize,
    /// Descriptor key that always resolves to an empty field list.
    pub empty_descriptor_key:    String,
    /// Lines per record in the event spec file.
    pub event_stride:            usize,
    /// Lines before the first row of the preference table.
    pub pref_header_lines:       usize,
    /// Pointee type of the handle parameter stripped by the rewriter.
    pub handle_type:             String,
    pub paths:                   PathConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub descriptors:       PathBuf,
    pub events:            PathBuf,
    pub events_output:     PathBuf,
    pub prefs:             PathBuf,
    pub prefs_output:      PathBuf,
    pub signatures:        PathBuf,
    pub signatures_output: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            descriptor_header_lines: 17,
            empty_descriptor_key:    "pevt_generic_none_help".to_string(),
            event_stride:            5,
            pref_header_lines:       2,
            handle_type:             "hexchat_plugin".to_string(),
            paths:                   PathConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            descriptors:       PathBuf::from("src/event/print/text.c"),
            events:            PathBuf::from("src/event/print/textevents.in"),
            events_output:     PathBuf::from("src/event/print/impls.rs"),
            prefs:             PathBuf::from("src/pref/cfgfiles.c"),
            prefs_output:      PathBuf::from("src/pref/impls.rs"),
            signatures:        PathBuf::from("src/ffi/handle.in.rs"),
            signatures_output: PathBuf::from("src/ffi/handle.rs"),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> Result<Self, GenError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "descriptor_header_lines": 3 }"#).unwrap();
        assert_eq!(config.descriptor_header_lines, 3);
        assert_eq!(config.event_stride, 5);
        assert_eq!(config.handle_type, "hexchat_plugin");
        assert_eq!(config.paths, PathConfig::default());
    }

    #[test]
    fn nested_paths_override() {
        let config = GeneratorConfig::from_json(r#"{ "paths": { "prefs": "cfg.c" } }"#).unwrap();
        assert_eq!(config.paths.prefs, PathBuf::from("cfg.c"));
        assert_eq!(config.paths.prefs_output, PathBuf::from("src/pref/impls.rs"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = GeneratorConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, GenError::Json(_)));
    }
}
