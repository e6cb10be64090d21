//! Temporary copies of rendered input files
//!
//! The structured readers take file paths, so rendered template output is
//! written to a temporary file carrying the original extension. The file is
//! removed when the [`StagedFile`] is dropped.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{CliError, Result};

#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Writes `contents` to a fresh temporary file.
    ///
    /// `extension` is appended as `.ext` so readers that dispatch on the file
    /// extension see the same type as the original input.
    pub fn stage(contents: &str, extension: Option<&str>) -> Result<Self> {
        let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("nurbs-input-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|source| CliError::FileAccess {
                path: std::env::temp_dir(),
                source,
            })?;

        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| CliError::FileAccess {
                path: file.path().to_path_buf(),
                source,
            })?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(self.path()).map_err(|source| CliError::FileAccess {
            path: self.path().to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_file_keeps_extension() {
        let staged = StagedFile::stage("a: 1\n", Some("yaml")).unwrap();
        assert_eq!(staged.path().extension().unwrap(), "yaml");
        assert_eq!(staged.read().unwrap(), "a: 1\n");
    }

    #[test]
    fn staged_file_without_extension() {
        let staged = StagedFile::stage("{}", None).unwrap();
        assert!(staged.path().extension().is_none());
    }

    #[test]
    fn staged_file_removed_on_drop() {
        let staged = StagedFile::stage("x", Some("json")).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }
}
