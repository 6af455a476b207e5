//! Error types for the critlog-core library.
//!
//! Every failure falls into one of three user-facing classes (see
//! [`ErrorClass`]): bad configuration, an unreachable source, or bytes that
//! are not a critical event log.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for critlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Invalid arguments, detected before any I/O
    Config,
    /// The input bytes could not be obtained
    Source,
    /// The input bytes are not a valid log
    Decode,
    /// A bug in critlog itself
    Internal,
}

/// Error type for all critlog operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// One or more requested event types are not known
    #[error("invalid event type(s): {} (valid types: {valid})", .names.join(", "))]
    InvalidEventTypes {
        /// The rejected names, in the order given
        names: Vec<String>,
        /// Comma separated list of accepted names
        valid: String,
    },

    /// Input file does not exist
    #[error("file '{path}' not found")]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Could not create the local copy of a pulled log
    #[error("failed to create temporary file in '{dir}': {source}")]
    TempFile {
        /// Directory the file was to be created in
        dir: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No device reachable through the device bridge
    #[error("no device available: {reason}")]
    DeviceUnavailable {
        /// What the bridge (or the OS) reported
        reason: String,
    },

    /// The log file is not present on the device
    #[error("remote file '{path}' not found on device")]
    RemoteFileNotFound {
        /// Remote path that was requested
        path: String,
    },

    /// The device bridge failed for another reason
    #[error("failed to pull '{path}' from device: {stderr}")]
    PullFailed {
        /// Remote path that was requested
        path: String,
        /// Trimmed stderr of the bridge
        stderr: String,
    },

    /// Input is not a serialized critical event log
    #[error("failed to decode critical event log from {source_description}: {cause}")]
    Decode {
        /// Where the bytes came from
        source_description: String,
        /// Underlying protobuf error
        #[source]
        cause: prost::DecodeError,
    },

    /// Invalid protobuf wire format
    #[error("invalid protobuf wire format at offset {offset}: {details}")]
    InvalidWireFormat {
        /// Byte offset where the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// Failed to decode varint
    #[error("failed to decode varint at offset {offset}: buffer too small or invalid encoding")]
    VarintDecode {
        /// Byte offset where the error occurred
        offset: usize,
    },

    /// Invalid field number on the wire
    #[error("invalid field number {number}: must be between 1 and {max}")]
    InvalidFieldNumber {
        /// The invalid field number
        number: u64,
        /// Maximum valid field number
        max: u32,
    },

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new invalid event types error
    pub fn invalid_event_types(names: Vec<String>, valid: impl Into<String>) -> Self {
        Self::InvalidEventTypes {
            names,
            valid: valid.into(),
        }
    }

    /// Creates a new file read error, mapping `NotFound` to [`Error::FileNotFound`]
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound { path };
        }
        Self::FileRead { path, source }
    }

    /// Creates a new temporary file error
    pub fn temp_file(dir: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TempFile {
            dir: dir.into(),
            source,
        }
    }

    /// Creates a new device unavailable error
    pub fn device_unavailable(reason: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new remote file not found error
    pub fn remote_file_not_found(path: impl Into<String>) -> Self {
        Self::RemoteFileNotFound { path: path.into() }
    }

    /// Creates a new pull failure error
    pub fn pull_failed(path: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::PullFailed {
            path: path.into(),
            stderr: stderr.into(),
        }
    }

    /// Creates a new decode error
    pub fn decode(source_description: impl Into<String>, cause: prost::DecodeError) -> Self {
        Self::Decode {
            source_description: source_description.into(),
            cause,
        }
    }

    /// Creates a new wire format error
    pub fn invalid_wire_format(offset: usize, details: impl Into<String>) -> Self {
        Self::InvalidWireFormat {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new varint decode error
    pub fn varint_decode(offset: usize) -> Self {
        Self::VarintDecode { offset }
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the class this error belongs to
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidEventTypes { .. } => ErrorClass::Config,
            Self::FileNotFound { .. }
            | Self::FileRead { .. }
            | Self::TempFile { .. }
            | Self::DeviceUnavailable { .. }
            | Self::RemoteFileNotFound { .. }
            | Self::PullFailed { .. } => ErrorClass::Source,
            Self::Decode { .. }
            | Self::InvalidWireFormat { .. }
            | Self::VarintDecode { .. }
            | Self::InvalidFieldNumber { .. } => ErrorClass::Decode,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }
}
