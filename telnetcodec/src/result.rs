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


use crate::TelnetOption;

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur in the codec handling process.
///
/// An incomplete frame is never an error while the stream is open; the parser keeps the bytes
/// and waits for more. The `MissingSubnegotiationTerminator` and `IncompleteCommand` variants
/// only surface once the stream has ended with bytes still buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    ///
    /// Contains the error kind and a description of what operation failed.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// The stream ended inside `IAC SB <option> ...` before `IAC SE` arrived.
    MissingSubnegotiationTerminator {
        /// The option of the unterminated subnegotiation, if its byte arrived
        option: Option<TelnetOption>,
        /// Number of bytes left in the parser buffer
        pending: usize,
    },

    /// The stream ended inside a two or three byte command.
    IncompleteCommand {
        /// The bytes left in the parser buffer
        pending: Vec<u8>,
    },

    /// A command frame whose code cannot be sent as `IAC <command>`.
    UnencodableCommand {
        /// The offending command code
        code: u8,
    },

    /// Error occurred while interpreting a subnegotiation payload.
    SubnegotiationError {
        /// The telnet option being subnegotiated
        option: Option<u8>,
        /// Specific reason for the failure
        reason: SubnegotiationErrorKind,
    },
}

/// Specific kinds of subnegotiation errors with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnegotiationErrorKind {
    /// Insufficient data available to decode the subnegotiation.
    InsufficientData {
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },

    /// Invalid command byte in the subnegotiation data.
    InvalidCommand {
        /// The invalid command byte
        command: u8,
        /// Expected command bytes, if known
        expected: Option<Vec<u8>>,
    },

    /// Unexpected data present when none was expected.
    UnexpectedData {
        /// Description of why the data is unexpected
        reason: String,
    },

    /// Incomplete data structure (e.g., an `ESC` as the last byte).
    IncompleteData {
        /// Description of what data is incomplete
        description: String,
    },
}

impl CodecError {
    pub(crate) fn subnegotiation(option: u8, reason: SubnegotiationErrorKind) -> CodecError {
        CodecError::SubnegotiationError {
            option: Some(option),
            reason,
        }
    }
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
            CodecError::MissingSubnegotiationTerminator { option, pending } => match option {
                Some(option) => write!(
                    f,
                    "Subnegotiation for {} not terminated by IAC SE ({} bytes pending)",
                    option, pending
                ),
                None => write!(
                    f,
                    "Subnegotiation not terminated by IAC SE ({} bytes pending)",
                    pending
                ),
            },
            CodecError::IncompleteCommand { pending } => {
                write!(f, "Incomplete telnet command: {:02X?}", pending)
            }
            CodecError::UnencodableCommand { code } => {
                write!(f, "Command code 0x{:02X} cannot be sent as IAC <command>", code)
            }
            CodecError::SubnegotiationError { option, reason } => {
                if let Some(opt) = option {
                    write!(f, "Subnegotiation error for option {}: {}", opt, reason)
                } else {
                    write!(f, "Subnegotiation error: {}", reason)
                }
            }
        }
    }
}

impl std::fmt::Display for SubnegotiationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnegotiationErrorKind::InsufficientData {
                required,
                available,
            } => {
                write!(
                    f,
                    "insufficient data (required: {}, available: {})",
                    required, available
                )
            }
            SubnegotiationErrorKind::InvalidCommand { command, expected } => {
                if let Some(exp) = expected {
                    write!(
                        f,
                        "invalid command 0x{:02X} (expected one of: {:?})",
                        command, exp
                    )
                } else {
                    write!(f, "invalid command: 0x{:02X}", command)
                }
            }
            SubnegotiationErrorKind::UnexpectedData { reason } => {
                write!(f, "unexpected data: {}", reason)
            }
            SubnegotiationErrorKind::IncompleteData { description } => {
                write!(f, "incomplete data: {}", description)
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_terminator() {
        let err = CodecError::MissingSubnegotiationTerminator {
            option: Some(TelnetOption::TTYPE),
            pending: 3,
        };
        assert_eq!(
            err.to_string(),
            "Subnegotiation for TTYPE not terminated by IAC SE (3 bytes pending)"
        );
    }

    #[test]
    fn display_subnegotiation_error() {
        let err = CodecError::subnegotiation(
            31,
            SubnegotiationErrorKind::InsufficientData {
                required: 4,
                available: 2,
            },
        );
        assert_eq!(
            err.to_string(),
            "Subnegotiation error for option 31: insufficient data (required: 4, available: 2)"
        );
    }

    #[test]
    fn io_error_conversion() {
        let err: CodecError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(
            err,
            CodecError::IOError {
                kind: std::io::ErrorKind::BrokenPipe,
                ..
            }
        ));
    }
}
