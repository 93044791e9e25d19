/*!
 * Error Types
 * Synchronization outcome vocabulary and structured failures with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use thiserror::Error;

use crate::core::limits::SYNCHRONIZATION_ERROR_BASE;

/// Outcome of a blocking wait on a waitable object
///
/// Always returned, never raised: timeout and abandonment are expected
/// results the caller branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOutcome {
    /// Object signaled / acquired
    Ok,
    /// Timeout elapsed before the object was signaled
    Timeout,
    /// Acquired, but the previous owner terminated while holding it
    Abandoned,
    /// The wait or release could not be performed
    Failed,
}

impl WaitOutcome {
    /// Numeric wait code (0..=3)
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Timeout => 1,
            Self::Abandoned => 2,
            Self::Failed => 3,
        }
    }

    /// Whether the caller now holds / observed the object
    ///
    /// An abandoned wait still transfers ownership.
    #[inline]
    pub const fn is_acquired(self) -> bool {
        matches!(self, Self::Ok | Self::Abandoned)
    }
}

impl fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::Timeout => "timeout",
            Self::Abandoned => "abandoned",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Closed set of synchronization failure kinds
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case")]
pub enum LockErrorKind {
    #[error("operation cancelled")]
    #[diagnostic(
        code(sync::operation_cancelled),
        help("The synchronization operation was cancelled before it completed.")
    )]
    OperationCancelled,

    #[error("cannot acquire lock for read")]
    #[diagnostic(
        code(sync::cannot_acquire_read),
        help("The lock is held exclusively or would self-deadlock. Check lock ordering and timeouts.")
    )]
    CannotAcquireRead,

    #[error("cannot acquire lock for write")]
    #[diagnostic(
        code(sync::cannot_acquire_write),
        help("The lock is held by other holders or would self-deadlock. Check lock ordering and timeouts.")
    )]
    CannotAcquireWrite,

    #[error("cannot release lock")]
    #[diagnostic(
        code(sync::cannot_release),
        help("Only the holder of a lock may release it.")
    )]
    CannotRelease,

    #[error("cannot create lock")]
    #[diagnostic(
        code(sync::cannot_create_lock),
        help("The handle table is exhausted or the backend is unavailable. Release unused locks or pick another backend.")
    )]
    CannotCreateLock,

    #[error("cannot create event")]
    #[diagnostic(
        code(sync::cannot_create_event),
        help("The handle table is exhausted. Release unused events or raise the handle limit.")
    )]
    CannotCreateEvent,

    #[error("no lock provided")]
    #[diagnostic(
        code(sync::missing_lock),
        help("This guard requires a lock reference.")
    )]
    MissingLock,
}

impl LockErrorKind {
    /// Numeric error code, counted from the synchronization error base
    pub const fn code(self) -> u32 {
        let offset = match self {
            Self::OperationCancelled => 0,
            Self::CannotAcquireRead => 1,
            Self::CannotAcquireWrite => 2,
            Self::CannotRelease => 3,
            Self::CannotCreateLock => 4,
            Self::CannotCreateEvent => 5,
            Self::MissingLock => 6,
        };
        SYNCHRONIZATION_ERROR_BASE + offset
    }

    /// Snake-case tag used in serialized errors
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OperationCancelled => "operation_cancelled",
            Self::CannotAcquireRead => "cannot_acquire_read",
            Self::CannotAcquireWrite => "cannot_acquire_write",
            Self::CannotRelease => "cannot_release",
            Self::CannotCreateLock => "cannot_create_lock",
            Self::CannotCreateEvent => "cannot_create_event",
            Self::MissingLock => "missing_lock",
        }
    }
}

/// Structured synchronization failure
///
/// Carries the error kind, a human-readable message, and the source location
/// of the call that failed. Presentation is left to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message} (at {}:{})", .location.file(), .location.line())]
pub struct SyncError {
    kind: LockErrorKind,
    message: String,
    location: &'static Location<'static>,
    system_code: Option<u32>,
}

impl SyncError {
    /// Create an error located at the caller
    #[track_caller]
    pub fn new(kind: LockErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
            system_code: None,
        }
    }

    /// Attach the underlying primitive's error code
    pub fn with_system_code(mut self, code: u32) -> Self {
        self.system_code = Some(code);
        self
    }

    #[inline]
    pub fn kind(&self) -> LockErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    #[inline]
    pub fn system_code(&self) -> Option<u32> {
        self.system_code
    }

    /// Numeric error code of the kind
    #[inline]
    pub fn code(&self) -> u32 {
        self.kind.code()
    }
}

impl Diagnostic for SyncError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Diagnostic::code(&self.kind)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Diagnostic::help(&self.kind)
    }
}

/// Serializable error representation for logs and reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SerializableError {
    pub error_type: String,
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&SyncError> for SerializableError {
    fn from(err: &SyncError) -> Self {
        let location = err.location();
        Self {
            error_type: err.kind().as_str().to_string(),
            code: err.code(),
            message: err.message().to_string(),
            details: Some(format!("{}:{}", location.file(), location.line())),
        }
    }
}

impl From<SyncError> for SerializableError {
    fn from(err: SyncError) -> Self {
        Self::from(&err)
    }
}

/// Result type for synchronization operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;
