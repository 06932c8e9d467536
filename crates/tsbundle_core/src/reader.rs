use log::trace;
use std::{fs, io, path::Path};

use crate::error::{BundleError, Result};

/// Reads a module's full source text.
pub fn read_source(path: &Path) -> Result<String> {
    trace!("Reading source: {}", path.display());
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BundleError::NotFound { path: path.to_path_buf() },
        _ => BundleError::Io { path: path.to_path_buf(), source: e },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.ts");
        fs::write(&file, "export const a = 1;\n").unwrap();

        assert_eq!(read_source(&file).unwrap(), "export const a = 1;\n");
        // Reading twice needs no caching on the caller's side
        assert_eq!(read_source(&file).unwrap(), "export const a = 1;\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("missing.ts");

        let err = read_source(&file).unwrap_err();
        assert!(matches!(err, BundleError::NotFound { ref path } if *path == file));
    }

    #[test]
    fn test_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = read_source(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
