//! Error conversion helpers for filesystem operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs::canonicalize(&dir).with_path_context("resolve plays dir", &dir)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

impl<T> IoResultExt<T> for Result<T, walkdir::Error> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Scan {
            path: path.to_path_buf(),
            message: format!("{action}: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn given_missing_file_when_read_then_operation_failed_names_path() {
        let path = Path::new("/definitely/not/here.py");

        let result = fs::read_to_string(path).with_path_context("read play", path);

        match result {
            Err(ApplicationError::OperationFailed { context, .. }) => {
                assert_eq!(context, "read play: /definitely/not/here.py");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
