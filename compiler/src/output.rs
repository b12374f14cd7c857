use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::error::GenError;

/// Writes `contents` to `path` through a temporary file in the same directory, so an
/// interrupted run never leaves a truncated file behind.
pub fn write_output(path: &Path, contents: &str) -> Result<(), GenError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Fails with `StaleOutput` unless `path` already holds exactly `contents`.
pub fn check_output(path: &Path, contents: &str) -> Result<(), GenError> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => {
            info!("{} is up to date", path.display());
            Ok(())
        }
        Ok(_) => Err(GenError::StaleOutput(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(GenError::StaleOutput(path.to_path_buf())),
        Err(e) => Err(GenError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_output_passes_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impls.rs");
        write_output(&path, "pref!(A, \"a\", bool);\n").unwrap();
        check_output(&path, "pref!(A, \"a\", bool);\n").unwrap();
    }

    #[test]
    fn missing_or_different_output_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impls.rs");
        assert!(matches!(check_output(&path, "x"), Err(GenError::StaleOutput(_))));
        write_output(&path, "x").unwrap();
        assert!(matches!(check_output(&path, "y"), Err(GenError::StaleOutput(_))));
    }

    #[test]
    fn rewriting_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impls.rs");
        write_output(&path, "old contents that are longer\n").unwrap();
        write_output(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }
}
