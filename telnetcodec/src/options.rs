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
/// [Telnet Terminal Options](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml)
/// exercised by the harness. Any other option code is carried as [`TelnetOption::Unknown`].
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// [`consts::option::BINARY`] Telnet Binary Transmission [RFC856](https://tools.ietf.org/html/rfc856)
    TransmitBinary,
    /// [`consts::option::ECHO`] Telnet Echo Option [RFC857](https://tools.ietf.org/html/rfc857)
    Echo,
    /// [`consts::option::SGA`] Suppress Go ahead [RFC858](https://tools.ietf.org/html/rfc858)
    SuppressGoAhead,
    /// [`consts::option::TTYPE`] Terminal Type [RFC1091](http://www.iana.org/go/rfc1091)
    TTYPE,
    /// [`consts::option::NAWS`] Negotiate About Window Size [RFC1073](http://www.iana.org/go/rfc1073)
    NAWS,
    /// [`consts::option::TSPEED`] Terminal Speed [RFC1079](http://www.iana.org/go/rfc1079)
    TSPEED,
    /// [`consts::option::LINEMODE`] Linemode [RFC1184](http://www.iana.org/go/rfc1184)
    Linemode,
    /// [`consts::option::ENVIRON`] Environment Option [RFC1408](http://www.iana.org/go/rfc1408)
    Environment,
    /// Unknown Option
    Unknown(u8),
}

impl TelnetOption {
    /// Every option with a dedicated variant, in option code order.
    pub const KNOWN: [TelnetOption; 8] = [
        TelnetOption::TransmitBinary,
        TelnetOption::Echo,
        TelnetOption::SuppressGoAhead,
        TelnetOption::TTYPE,
        TelnetOption::NAWS,
        TelnetOption::TSPEED,
        TelnetOption::Linemode,
        TelnetOption::Environment,
    ];

    /// Converts a `TelnetOption` into its option code.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::TTYPE => consts::option::TTYPE,
            TelnetOption::NAWS => consts::option::NAWS,
            TelnetOption::TSPEED => consts::option::TSPEED,
            TelnetOption::Linemode => consts::option::LINEMODE,
            TelnetOption::Environment => consts::option::ENVIRON,
            TelnetOption::Unknown(byte) => *byte,
        }
    }

    /// Converts an option code into a `TelnetOption`.
    ///
    /// Codes without a dedicated variant map to [`TelnetOption::Unknown`], so
    /// `TelnetOption::from_u8(code).to_u8() == code` for every code.
    pub fn from_u8(byte: u8) -> TelnetOption {
        match byte {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::TTYPE => TelnetOption::TTYPE,
            consts::option::NAWS => TelnetOption::NAWS,
            consts::option::TSPEED => TelnetOption::TSPEED,
            consts::option::LINEMODE => TelnetOption::Linemode,
            consts::option::ENVIRON => TelnetOption::Environment,
            byte => TelnetOption::Unknown(byte),
        }
    }

    /// Whether this option has a dedicated variant.
    pub fn is_known(&self) -> bool {
        !matches!(self, TelnetOption::Unknown(_))
    }

    /// Whether this option carries option specific subnegotiation payloads.
    pub fn has_subnegotiation(&self) -> bool {
        matches!(
            self,
            TelnetOption::TTYPE
                | TelnetOption::NAWS
                | TelnetOption::TSPEED
                | TelnetOption::Linemode
                | TelnetOption::Environment
        )
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TransmitBinary"),
            TelnetOption::Echo => write!(f, "Echo"),
            TelnetOption::SuppressGoAhead => write!(f, "SuppressGoAhead"),
            TelnetOption::TTYPE => write!(f, "TTYPE"),
            TelnetOption::NAWS => write!(f, "NAWS"),
            TelnetOption::TSPEED => write!(f, "TSPEED"),
            TelnetOption::Linemode => write!(f, "Linemode"),
            TelnetOption::Environment => write!(f, "Environment"),
            TelnetOption::Unknown(option) => write!(f, "Unknown({option})"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        Self::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}
