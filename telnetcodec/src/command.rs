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


use crate::consts;

///
/// Two byte Telnet commands (`IAC <command>`).
///
/// The structural codes `IAC`, `SB` and the negotiation verbs never appear here; they are
/// consumed by the framing itself. Any other code without a dedicated variant is preserved
/// as [`TelnetCommand::Unknown`] so unimplemented commands pass through the parser.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetCommand {
    /// End of Record
    EndOfRecord,
    /// Subnegotiation End outside of a subnegotiation
    SubnegotiationEnd,
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// Unrecognized command code
    Unknown(u8),
}

impl TelnetCommand {
    /// Command code on the wire.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetCommand::EndOfRecord => consts::EOR,
            TelnetCommand::SubnegotiationEnd => consts::SE,
            TelnetCommand::NoOperation => consts::NOP,
            TelnetCommand::DataMark => consts::DM,
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
            TelnetCommand::Unknown(code) => *code,
        }
    }

    /// Maps a command code to a `TelnetCommand`.
    pub fn from_u8(code: u8) -> TelnetCommand {
        match code {
            consts::EOR => TelnetCommand::EndOfRecord,
            consts::SE => TelnetCommand::SubnegotiationEnd,
            consts::NOP => TelnetCommand::NoOperation,
            consts::DM => TelnetCommand::DataMark,
            consts::BRK => TelnetCommand::Break,
            consts::IP => TelnetCommand::InterruptProcess,
            consts::AO => TelnetCommand::AbortOutput,
            consts::AYT => TelnetCommand::AreYouThere,
            consts::EC => TelnetCommand::EraseCharacter,
            consts::EL => TelnetCommand::EraseLine,
            consts::GA => TelnetCommand::GoAhead,
            code => TelnetCommand::Unknown(code),
        }
    }

    /// Whether `IAC <code>` parses back to this command.
    ///
    /// `Unknown` holding `IAC`, `SB`, a negotiation verb or a code with its own variant
    /// cannot be sent as a two byte command.
    pub fn is_encodable(&self) -> bool {
        match self {
            TelnetCommand::Unknown(code) => {
                *code < consts::SB && TelnetCommand::from_u8(*code) == *self
            }
            _ => true,
        }
    }

    /// Short RFC mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            TelnetCommand::EndOfRecord => "EOR",
            TelnetCommand::SubnegotiationEnd => "SE",
            TelnetCommand::NoOperation => "NOP",
            TelnetCommand::DataMark => "DM",
            TelnetCommand::Break => "BRK",
            TelnetCommand::InterruptProcess => "IP",
            TelnetCommand::AbortOutput => "AO",
            TelnetCommand::AreYouThere => "AYT",
            TelnetCommand::EraseCharacter => "EC",
            TelnetCommand::EraseLine => "EL",
            TelnetCommand::GoAhead => "GA",
            TelnetCommand::Unknown(_) => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TelnetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetCommand::Unknown(code) => write!(f, "UNKNOWN(0x{code:02X})"),
            other => f.write_str(other.name()),
        }
    }
}

///
/// Option negotiation verbs (`IAC <verb> <option>`).
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NegotiationVerb {
    /// Sender wants to enable the option locally
    Will,
    /// Sender refuses to enable the option locally
    Wont,
    /// Sender asks the receiver to enable the option
    Do,
    /// Sender asks the receiver to disable the option
    Dont,
}

impl NegotiationVerb {
    /// Verb code on the wire.
    pub fn to_u8(&self) -> u8 {
        match self {
            NegotiationVerb::Will => consts::WILL,
            NegotiationVerb::Wont => consts::WONT,
            NegotiationVerb::Do => consts::DO,
            NegotiationVerb::Dont => consts::DONT,
        }
    }

    /// Maps a code to a verb, `None` when the code is not a negotiation verb.
    pub fn from_u8(code: u8) -> Option<NegotiationVerb> {
        match code {
            consts::WILL => Some(NegotiationVerb::Will),
            consts::WONT => Some(NegotiationVerb::Wont),
            consts::DO => Some(NegotiationVerb::Do),
            consts::DONT => Some(NegotiationVerb::Dont),
            _ => None,
        }
    }

    /// Whether the verb accepts or requests an option.
    pub fn is_affirmative(&self) -> bool {
        matches!(self, NegotiationVerb::Will | NegotiationVerb::Do)
    }

    /// Whether the verb speaks about the sender's side (`WILL`/`WONT`).
    pub fn is_local(&self) -> bool {
        matches!(self, NegotiationVerb::Will | NegotiationVerb::Wont)
    }
}

impl std::fmt::Display for NegotiationVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationVerb::Will => f.write_str("WILL"),
            NegotiationVerb::Wont => f.write_str("WONT"),
            NegotiationVerb::Do => f.write_str("DO"),
            NegotiationVerb::Dont => f.write_str("DONT"),
        }
    }
}
