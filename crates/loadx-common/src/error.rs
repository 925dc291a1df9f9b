//! Error types for loadx

use pyo3::exceptions::{
    PyConnectionError, PyPermissionError, PyRuntimeError, PyTimeoutError, PyValueError,
};
use pyo3::PyErr;
use thiserror::Error;

/// Result type alias for loadx operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for the MongoDB bridge
///
/// Variants follow the kinds a script can observe. The driver's own message is
/// carried verbatim so scripts see the driver's diagnostic text.
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Connection string or client options rejected
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network, DNS, server selection or pool failure
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Duplicate key, document validation and other write errors
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// Server-side time limit or adapter deadline exceeded
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure while draining a query cursor into memory
    #[error("Cursor drain failed: {0}")]
    CursorDrain(String),

    /// Script argument that could not be coerced into BSON
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("MongoDB error: {0}")]
    MongoDB(String),
}

impl BridgeError {
    /// Returns true if this error came from draining a cursor
    pub fn is_cursor_drain(&self) -> bool {
        matches!(self, BridgeError::CursorDrain(_))
    }

    /// Re-tag a driver failure as a cursor drain failure, keeping its message
    pub fn into_cursor_drain(self) -> Self {
        match self {
            BridgeError::CursorDrain(msg) => BridgeError::CursorDrain(msg),
            other => BridgeError::CursorDrain(other.to_string()),
        }
    }
}

impl From<BridgeError> for PyErr {
    fn from(err: BridgeError) -> PyErr {
        let msg = err.to_string();
        match err {
            BridgeError::Configuration(_)
            | BridgeError::InvalidArgument(_)
            | BridgeError::Decode(_) => PyValueError::new_err(msg),
            BridgeError::Connection(_) => PyConnectionError::new_err(msg),
            BridgeError::Authentication(_) => PyPermissionError::new_err(msg),
            BridgeError::Timeout(_) => PyTimeoutError::new_err(msg),
            BridgeError::WriteRejected(_)
            | BridgeError::CursorDrain(_)
            | BridgeError::MongoDB(_) => PyRuntimeError::new_err(msg),
        }
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for BridgeError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        // MaxTimeMSExpired
        const MAX_TIME_EXPIRED: i32 = 50;

        let msg = err.to_string();
        match err.kind.as_ref() {
            ErrorKind::InvalidArgument { .. } | ErrorKind::InvalidTlsConfig { .. } => {
                BridgeError::Configuration(msg)
            }
            ErrorKind::Authentication { .. } => BridgeError::Authentication(msg),
            ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                BridgeError::Timeout(msg)
            }
            ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => BridgeError::Connection(msg),
            ErrorKind::Command(cmd) if cmd.code == MAX_TIME_EXPIRED => BridgeError::Timeout(msg),
            ErrorKind::Write(_) | ErrorKind::InsertMany(_) => BridgeError::WriteRejected(msg),
            ErrorKind::BsonDeserialization(_) => BridgeError::Decode(msg),
            ErrorKind::BsonSerialization(_) => BridgeError::InvalidArgument(msg),
            _ => BridgeError::MongoDB(msg),
        }
    }
}
