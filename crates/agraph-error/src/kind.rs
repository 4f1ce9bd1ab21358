//! Error kinds for agraph operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to react; the message and
/// context carry the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration, e.g. a report without an output destination
    ConfigInvalid,

    // =========================================================================
    // Input errors
    // =========================================================================
    /// Input document is structurally valid but semantically wrong
    InvalidFormat,

    /// Input document could not be decoded
    DeserializationFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// True for the kinds produced by filesystem access.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ErrorKind::FileNotFound | ErrorKind::PermissionDenied | ErrorKind::IoFailed
        )
    }
}
