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


//! Environment Option (RFC 1408)
//!

use crate::consts::option::{ENVIRON, environ};
use crate::{CodecError, CodecResult, SubnegotiationErrorKind};

/// Whether a variable name is well-known (`VAR`) or user-defined (`USERVAR`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Well-known variable such as `USER` or `DISPLAY`
    Var,
    /// User-defined variable
    UserVar,
}

impl VariableKind {
    fn to_u8(self) -> u8 {
        match self {
            VariableKind::Var => environ::VAR,
            VariableKind::UserVar => environ::USERVAR,
        }
    }
}

/// A single variable in an `ENVIRON` list.
///
/// `value` is `None` when the variable is named without a `VALUE` marker, which in a
/// `SEND` means "send this one" and in an `IS` means the variable is undefined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentVariable {
    /// `VAR` or `USERVAR`
    pub kind: VariableKind,
    /// Variable name
    pub name: String,
    /// Variable value, if one was given
    pub value: Option<String>,
}

impl EnvironmentVariable {
    /// Well-known variable with no value.
    pub fn var(name: impl Into<String>) -> Self {
        EnvironmentVariable {
            kind: VariableKind::Var,
            name: name.into(),
            value: None,
        }
    }

    /// User-defined variable with no value.
    pub fn user_var(name: impl Into<String>) -> Self {
        EnvironmentVariable {
            kind: VariableKind::UserVar,
            name: name.into(),
            value: None,
        }
    }

    /// Attaches a value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl std::fmt::Display for EnvironmentVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            VariableKind::Var => "VAR",
            VariableKind::UserVar => "USERVAR",
        };
        match &self.value {
            Some(value) => write!(f, "{kind} {}={value:?}", self.name),
            None => write!(f, "{kind} {}", self.name),
        }
    }
}

/// An `ENVIRON` subnegotiation payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentMessage {
    /// `SEND`: request the listed variables, or all of them when the list is empty
    Send(Vec<EnvironmentVariable>),
    /// `IS`: reply to a `SEND`
    Is(Vec<EnvironmentVariable>),
    /// `INFO`: unsolicited update
    Info(Vec<EnvironmentVariable>),
}

impl EnvironmentMessage {
    /// The carried variables.
    pub fn variables(&self) -> &[EnvironmentVariable] {
        match self {
            EnvironmentMessage::Send(vars)
            | EnvironmentMessage::Is(vars)
            | EnvironmentMessage::Info(vars) => vars,
        }
    }

    /// Looks up the value reported for `name`, ignoring variable kind.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.variables()
            .iter()
            .find(|var| var.name == name)
            .and_then(|var| var.value.as_deref())
    }

    fn command(&self) -> u8 {
        match self {
            EnvironmentMessage::Send(_) => environ::SEND,
            EnvironmentMessage::Is(_) => environ::IS,
            EnvironmentMessage::Info(_) => environ::INFO,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.command()];
        for var in self.variables() {
            out.push(var.kind.to_u8());
            push_escaped(&mut out, var.name.as_bytes());
            if let Some(value) = &var.value {
                out.push(environ::VALUE);
                push_escaped(&mut out, value.as_bytes());
            }
        }
        out
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.to_bytes().len()
    }

    /// Writes the payload to `writer`, returning the number of bytes written.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        let bytes = self.to_bytes();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Decodes an `ENVIRON` payload.
    ///
    /// # Example
    /// ```
    /// use iacprobe_telnetcodec::environ::EnvironmentMessage;
    ///
    /// let msg = EnvironmentMessage::decode(b"\x00\x00USER\x01alice").unwrap();
    /// assert_eq!(msg.value_of("USER"), Some("alice"));
    /// ```
    pub fn decode(payload: &[u8]) -> CodecResult<EnvironmentMessage> {
        let Some((&command, list)) = payload.split_first() else {
            return Err(CodecError::subnegotiation(
                ENVIRON,
                SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            ));
        };
        let vars = decode_list(list)?;
        match command {
            environ::SEND => Ok(EnvironmentMessage::Send(vars)),
            environ::IS => Ok(EnvironmentMessage::Is(vars)),
            environ::INFO => Ok(EnvironmentMessage::Info(vars)),
            other => Err(CodecError::subnegotiation(
                ENVIRON,
                SubnegotiationErrorKind::InvalidCommand {
                    command: other,
                    expected: Some(vec![environ::IS, environ::SEND, environ::INFO]),
                },
            )),
        }
    }
}

fn push_escaped(out: &mut Vec<u8>, text: &[u8]) {
    for &byte in text {
        if matches!(
            byte,
            environ::VAR | environ::VALUE | environ::ESC | environ::USERVAR
        ) {
            out.push(environ::ESC);
        }
        out.push(byte);
    }
}

enum Field {
    Name,
    Value,
}

fn decode_list(list: &[u8]) -> CodecResult<Vec<EnvironmentVariable>> {
    let mut vars: Vec<EnvironmentVariable> = Vec::new();
    let mut field = Field::Name;
    let mut bytes = list.iter().copied();

    while let Some(byte) = bytes.next() {
        let literal = match byte {
            environ::VAR | environ::USERVAR => {
                let kind = if byte == environ::VAR {
                    VariableKind::Var
                } else {
                    VariableKind::UserVar
                };
                vars.push(EnvironmentVariable {
                    kind,
                    name: String::new(),
                    value: None,
                });
                field = Field::Name;
                continue;
            }
            environ::VALUE => {
                let Some(var) = vars.last_mut() else {
                    return Err(unexpected("VALUE before any variable name"));
                };
                var.value = Some(String::new());
                field = Field::Value;
                continue;
            }
            environ::ESC => bytes
                .next()
                .ok_or_else(|| unexpected("ESC at end of list"))?,
            other => other,
        };
        let Some(var) = vars.last_mut() else {
            return Err(unexpected("text before any variable marker"));
        };
        let target = match field {
            Field::Name => &mut var.name,
            Field::Value => var.value.get_or_insert_with(String::new),
        };
        target.push(char::from(literal));
    }
    Ok(vars)
}

fn unexpected(reason: &str) -> CodecError {
    CodecError::subnegotiation(
        ENVIRON,
        SubnegotiationErrorKind::UnexpectedData {
            reason: reason.to_string(),
        },
    )
}

impl std::fmt::Display for EnvironmentMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let command = match self {
            EnvironmentMessage::Send(_) => "SEND",
            EnvironmentMessage::Is(_) => "IS",
            EnvironmentMessage::Info(_) => "INFO",
        };
        f.write_str(command)?;
        for var in self.variables() {
            write!(f, " [{var}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_for_user_and_display() {
        let msg = EnvironmentMessage::Send(vec![
            EnvironmentVariable::var("USER"),
            EnvironmentVariable::var("DISPLAY"),
        ]);
        let mut out = Vec::new();
        msg.write(&mut out).unwrap();
        assert_eq!(out, b"\x01\x00USER\x00DISPLAY");
        assert_eq!(msg.len(), out.len());
    }

    #[test]
    fn decode_is_with_undefined_variable() {
        let msg = EnvironmentMessage::decode(b"\x00\x00USER\x01bob\x00DISPLAY").unwrap();
        assert_eq!(
            msg,
            EnvironmentMessage::Is(vec![
                EnvironmentVariable::var("USER").with_value("bob"),
                EnvironmentVariable::var("DISPLAY"),
            ])
        );
        assert_eq!(msg.value_of("DISPLAY"), None);
    }

    #[test]
    fn empty_value_is_distinct_from_missing() {
        let msg = EnvironmentMessage::decode(b"\x00\x03TERM\x01").unwrap();
        assert_eq!(msg.variables()[0].value.as_deref(), Some(""));
        assert_eq!(msg.variables()[0].kind, VariableKind::UserVar);
    }

    #[test]
    fn escaped_marker_bytes_survive() {
        let msg = EnvironmentMessage::Info(vec![
            EnvironmentVariable::user_var("A\u{1}B").with_value("\u{2}"),
        ]);
        let mut out = Vec::new();
        msg.write(&mut out).unwrap();
        assert_eq!(out, b"\x02\x03A\x02\x01B\x01\x02\x02");
        assert_eq!(EnvironmentMessage::decode(&out).unwrap(), msg);
    }

    #[test]
    fn rejects_text_before_marker() {
        assert!(EnvironmentMessage::decode(b"\x00USER").is_err());
        assert!(EnvironmentMessage::decode(b"\x00\x01x").is_err());
        assert!(EnvironmentMessage::decode(b"\x05").is_err());
    }
}
