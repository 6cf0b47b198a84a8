//! Error types for the render cache

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CacheError {
    /// A filesystem operation on a cache path failed
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// The kind of the underlying I/O failure
    pub fn io_kind(&self) -> std::io::ErrorKind {
        match self {
            CacheError::Io { source, .. } => source.kind(),
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io { op, path, source } => {
                write!(f, "failed to {} {}: {}", op, path.display(), source)
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_error_display() {
        let err = CacheError::io(
            "write",
            "/cache/abc.html",
            std::io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(
            format!("{}", err),
            "failed to write /cache/abc.html: permission denied"
        );
        assert_eq!(err.io_kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_io_error_source() {
        let err = CacheError::io(
            "read",
            "/cache/abc.pdf",
            std::io::Error::new(ErrorKind::NotFound, "missing"),
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
