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


//! Telnet wire constants (RFC 854, RFC 855 and option RFCs)

/// Interpret As Command
pub const IAC: u8 = 255;
/// Refuse or stop performing an option on the remote side
pub const DONT: u8 = 254;
/// Request the remote side perform an option
pub const DO: u8 = 253;
/// Refuse or stop performing an option locally
pub const WONT: u8 = 252;
/// Offer to perform an option locally
pub const WILL: u8 = 251;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Go Ahead
pub const GA: u8 = 249;
/// Erase Line
pub const EL: u8 = 248;
/// Erase Character
pub const EC: u8 = 247;
/// Are You There
pub const AYT: u8 = 246;
/// Abort Output
pub const AO: u8 = 245;
/// Interrupt Process
pub const IP: u8 = 244;
/// Break
pub const BRK: u8 = 243;
/// Data Mark
pub const DM: u8 = 242;
/// No Operation
pub const NOP: u8 = 241;
/// Subnegotiation End
pub const SE: u8 = 240;
/// End of Record
pub const EOR: u8 = 239;

/// Carriage Return
pub const CR: u8 = b'\r';
/// Line Feed
pub const LF: u8 = b'\n';
/// Null
pub const NUL: u8 = 0;

/// Option codes
pub mod option {
    /// Binary Transmission [RFC856](https://tools.ietf.org/html/rfc856)
    pub const BINARY: u8 = 0;
    /// Echo [RFC857](https://tools.ietf.org/html/rfc857)
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead [RFC858](https://tools.ietf.org/html/rfc858)
    pub const SGA: u8 = 3;
    /// Terminal Type [RFC1091](http://www.iana.org/go/rfc1091)
    pub const TTYPE: u8 = 24;
    /// Negotiate About Window Size [RFC1073](http://www.iana.org/go/rfc1073)
    pub const NAWS: u8 = 31;
    /// Terminal Speed [RFC1079](http://www.iana.org/go/rfc1079)
    pub const TSPEED: u8 = 32;
    /// Linemode [RFC1184](http://www.iana.org/go/rfc1184)
    pub const LINEMODE: u8 = 34;
    /// Environment [RFC1408](http://www.iana.org/go/rfc1408)
    pub const ENVIRON: u8 = 36;

    /// Terminal Type and Terminal Speed subnegotiation codes
    pub mod ttype {
        /// Value follows
        pub const IS: u8 = 0;
        /// Request the value
        pub const SEND: u8 = 1;
    }

    /// Environment subnegotiation codes
    pub mod environ {
        /// Variables follow
        pub const IS: u8 = 0;
        /// Request variables
        pub const SEND: u8 = 1;
        /// Unsolicited variable update
        pub const INFO: u8 = 2;
        /// Well-known variable name follows
        pub const VAR: u8 = 0;
        /// Variable value follows
        pub const VALUE: u8 = 1;
        /// Next byte is literal
        pub const ESC: u8 = 2;
        /// User-defined variable name follows
        pub const USERVAR: u8 = 3;
    }

    /// Linemode subnegotiation codes
    pub mod linemode {
        /// MODE command
        pub const MODE: u8 = 1;
        /// FORWARDMASK command
        pub const FORWARDMASK: u8 = 2;
        /// SLC command
        pub const SLC: u8 = 3;

        /// Client performs line editing
        pub const MODE_EDIT: u8 = 0x01;
        /// Client traps signals
        pub const MODE_TRAPSIG: u8 = 0x02;
        /// Acknowledgement of a mode change
        pub const MODE_ACK: u8 = 0x04;
        /// Expand tabs locally
        pub const MODE_SOFT_TAB: u8 = 0x08;
        /// Echo non-printables literally
        pub const MODE_LIT_ECHO: u8 = 0x10;
        /// All defined mode bits
        pub const MODE_MASK: u8 = 0x1F;
    }
}
