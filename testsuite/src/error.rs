//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Error types for the conformance harness

use iacprobe_telnetcodec::CodecError;
use std::time::Duration;
use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness error types
#[derive(Debug, Error)]
pub enum HarnessError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error from the codec layer
    #[error("Protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// The peer closed the connection
    #[error("Connection closed")]
    ConnectionClosed,

    /// A write did not complete within the write timeout
    #[error("Operation timed out")]
    Timeout,

    /// No client connected within the accept timeout
    #[error("No connection accepted within {0:?}")]
    AcceptTimeout(Duration),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HarnessError {
    /// Check if the error is recoverable
    ///
    /// Protocol errors describe bytes the peer sent; the connection itself is still usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HarnessError::Protocol(_))
    }

    /// Check if the error means the connection is gone
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            HarnessError::ConnectionClosed | HarnessError::Io(_) | HarnessError::Timeout
        )
    }
}

/// Whether an I/O error kind means the peer went away.
pub(crate) fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_recoverable() {
        let protocol = HarnessError::from(CodecError::IncompleteCommand { pending: vec![255] });
        assert!(protocol.is_recoverable());
        assert!(!HarnessError::ConnectionClosed.is_recoverable());
        assert!(!HarnessError::Timeout.is_recoverable());
    }

    #[test]
    fn test_error_is_connection_error() {
        assert!(HarnessError::ConnectionClosed.is_connection_error());
        assert!(HarnessError::Timeout.is_connection_error());
        assert!(!HarnessError::InvalidConfig("x".to_string()).is_connection_error());
    }

    #[test]
    fn test_error_display() {
        let err = HarnessError::AcceptTimeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "No connection accepted within 250ms");

        let err = HarnessError::InvalidConfig("grace period too long".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: grace period too long");
    }

    #[test]
    fn test_disconnect_kinds() {
        assert!(is_disconnect(std::io::ErrorKind::BrokenPipe));
        assert!(!is_disconnect(std::io::ErrorKind::PermissionDenied));
    }
}
