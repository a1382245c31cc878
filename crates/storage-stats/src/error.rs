use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stable code reported across the bridge for every failed storage query.
pub const STORAGE_SPACE_ERROR: &str = "STORAGE_SPACE_ERROR";

/// Code for a request naming an operation the service does not provide.
///
/// The bridge answers such requests with a not-implemented response, so this
/// code only shows up in logs and through [`Error::code`].
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";

/// Errors that can occur while querying storage statistics.
///
/// Every OS failure is converted into one of these at the point of the OS
/// call, so no bare `io::Error` leaves the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No storage volume metadata could be obtained for the data path
    #[error("storage volume unavailable for {}: {source}", path.display())]
    VolumeUnavailable {
        /// Last candidate path that was probed
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// A well-known directory (support, cache, documents, bundle) could not
    /// be located or created
    #[error("directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        /// Directory that could not be resolved
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The OS declined to report a size/usage attribute for a path
    #[error("could not read size of {}: {reason}", path.display())]
    AttributeReadFailure {
        /// Path whose attributes could not be read
        path: PathBuf,
        /// OS error text or tool output
        reason: String,
    },

    /// The requested operation is not one of the recognized queries
    #[error("operation not implemented: {0}")]
    UnsupportedOperation(String),

    /// The platform context could not be resolved
    #[error("invalid platform context: {0}")]
    InvalidContext(String),
}

impl Error {
    /// Build an `AttributeReadFailure` for `path`.
    pub fn attribute(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::AttributeReadFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Machine-readable code carried across the bridge.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedOperation(_) => NOT_IMPLEMENTED,
            _ => STORAGE_SPACE_ERROR,
        }
    }

    /// Returns true if this error means "no such operation" rather than a
    /// runtime failure. The bridge reports these as not-implemented.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedOperation(_))
    }

    /// The underlying OS error, when the failure came from one.
    pub fn os_error(&self) -> Option<&io::Error> {
        match self {
            Error::VolumeUnavailable { source, .. } | Error::DirectoryUnavailable { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Result type for storage queries
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let unsupported = Error::UnsupportedOperation("getBatteryLevel".to_string());
        assert!(unsupported.is_unsupported());
        assert!(unsupported.os_error().is_none());
        assert_eq!(unsupported.code(), NOT_IMPLEMENTED);

        let dir = Error::DirectoryUnavailable {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!dir.is_unsupported());
        assert_eq!(
            dir.os_error().map(io::Error::kind),
            Some(io::ErrorKind::PermissionDenied)
        );
        assert_eq!(dir.code(), STORAGE_SPACE_ERROR);
    }

    #[test]
    fn test_failure_codes() {
        let failures = [
            Error::attribute("/tmp/x", "gone"),
            Error::InvalidContext("no volume candidates".to_string()),
            Error::VolumeUnavailable {
                path: PathBuf::from("/data"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        ];
        for err in &failures {
            assert_eq!(err.code(), STORAGE_SPACE_ERROR, "{err}");
        }
        assert_ne!(NOT_IMPLEMENTED, STORAGE_SPACE_ERROR);
    }

    #[test]
    fn test_display_includes_os_error() {
        let err = Error::VolumeUnavailable {
            path: PathBuf::from("/data"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let text = err.to_string();
        assert!(text.contains("/data"));
        assert!(text.contains("not found"));
    }

    #[test]
    fn test_attribute_helper() {
        let err = Error::attribute("/tmp/x", "permission denied");
        assert_eq!(
            err.to_string(),
            "could not read size of /tmp/x: permission denied"
        );
    }
}
