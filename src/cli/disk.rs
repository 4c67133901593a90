//! Reading shader sources from the file system.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::frontend::loader::{FileAccess, IncludedFile, Input};

/// Maximum source file size (16 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during compilation.
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// A source file that could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Cannot access file '{}': {source}", path.display())]
    Access { path: PathBuf, source: io::Error },
    #[error("Source file '{}' is too large ({size} bytes, max {max} bytes)", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("Error reading file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE`
pub fn read_source(path: &Path) -> Result<String, ReadError> {
    let metadata = fs::metadata(path).map_err(|source| ReadError::Access {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(ReadError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: MAX_SOURCE_SIZE,
        });
    }

    fs::read_to_string(path).map_err(|source| ReadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every root file; each becomes one named input of the unit.
pub fn read_inputs(paths: &[PathBuf]) -> Result<Vec<Input>, ReadError> {
    paths
        .iter()
        .map(|path| Ok(Input::new(path.to_string_lossy(), read_source(path)?)))
        .collect()
}

/// Resolves `#include "path"` against the directory of the including file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileAccess;

impl DiskFileAccess {
    /// Where `path` points when included from `relative_to`.
    pub fn resolve(path: &str, relative_to: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match Path::new(relative_to).parent() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl FileAccess for DiskFileAccess {
    fn read(&self, path: &str, relative_to: &str) -> Option<IncludedFile> {
        let resolved = Self::resolve(path, relative_to);
        match read_source(&resolved) {
            Ok(contents) => {
                tracing::debug!(path = %resolved.display(), "resolved include");
                Some(IncludedFile::new(resolved.to_string_lossy(), contents))
            }
            Err(err) => {
                tracing::debug!(error = %err, "include not found");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_including_file() {
        assert_eq!(
            DiskFileAccess::resolve("common.glslx", "shaders/main.glslx"),
            PathBuf::from("shaders/common.glslx")
        );
        assert_eq!(
            DiskFileAccess::resolve("../lib/noise.glslx", "shaders/main.glslx"),
            PathBuf::from("shaders/../lib/noise.glslx")
        );
        assert_eq!(DiskFileAccess::resolve("a.glslx", "main.glslx"), PathBuf::from("a.glslx"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_source(Path::new("definitely/not/here.glslx")).unwrap_err();
        assert!(matches!(err, ReadError::Access { .. }));
        assert!(DiskFileAccess.read("not/here.glslx", "main.glslx").is_none());
    }
}
