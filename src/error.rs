use std::fmt;

/// An error returned by a user directory operation.
///
/// Carries an [`ErrorKind`] for matching and a human-readable message for
/// logs. "Zero results" is never an error: list and count operations return
/// empty values instead.
///
/// # Examples
///
/// ```
/// use actor_context::{DirectoryError, ErrorKind};
///
/// let err = DirectoryError::not_found("user 42 not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "not found: user 42 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryError {
    kind: ErrorKind,
    message: String,
}

impl DirectoryError {
    /// Creates a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A lookup had no match.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// A create violated a uniqueness constraint.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// The backing store could not be reached.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// The request carries no authenticated actor.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// The input was rejected before reaching the store.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for DirectoryError {}

/// The kind of directory error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No record matched the lookup
    NotFound,
    /// A uniqueness constraint was violated
    Conflict,
    /// Storage or transport failure
    Unavailable,
    /// The operation needs an authenticated actor
    Unauthenticated,
    /// The input was malformed
    Invalid,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::Unavailable => write!(f, "unavailable"),
            ErrorKind::Unauthenticated => write!(f, "unauthenticated"),
            ErrorKind::Invalid => write!(f, "invalid input"),
        }
    }
}
