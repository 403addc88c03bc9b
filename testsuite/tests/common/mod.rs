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


//! A well-behaved Telnet client used as the peer in harness tests.

#![allow(dead_code)]

use iacprobe_telnetcodec::environ::{EnvironmentMessage, EnvironmentVariable};
use iacprobe_telnetcodec::linemode::LinemodeMessage;
use iacprobe_telnetcodec::naws::WindowSize;
use iacprobe_telnetcodec::tspeed::TerminalSpeedMessage;
use iacprobe_telnetcodec::ttype::TerminalTypeMessage;
use iacprobe_telnetcodec::{
    FrameParser, NegotiationVerb, TelnetArgument, TelnetCommand, TelnetFrame, TelnetOption,
    encode_frame, push_coalesced,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Options the client agrees to perform.
const SUPPORTED: [TelnetOption; 5] = [
    TelnetOption::TTYPE,
    TelnetOption::TSPEED,
    TelnetOption::Environment,
    TelnetOption::Linemode,
    TelnetOption::NAWS,
];

fn sb(argument: TelnetArgument) -> TelnetFrame {
    TelnetFrame::subnegotiation(&argument).unwrap()
}

/// Replies a conforming client sends for `frame`.
pub fn respond(frame: &TelnetFrame) -> Vec<TelnetFrame> {
    match frame {
        TelnetFrame::Command(TelnetCommand::AreYouThere) => {
            vec![TelnetFrame::data(&b"[Yes]\r\n"[..])]
        }
        TelnetFrame::Negotiation(NegotiationVerb::Will, TelnetOption::Echo) => {
            vec![TelnetFrame::do_(TelnetOption::Echo)]
        }
        TelnetFrame::Negotiation(NegotiationVerb::Do, TelnetOption::NAWS) => vec![
            TelnetFrame::will(TelnetOption::NAWS),
            sb(TelnetArgument::WindowSize(WindowSize::new(80, 24))),
        ],
        TelnetFrame::Negotiation(NegotiationVerb::Do, option) if SUPPORTED.contains(option) => {
            vec![TelnetFrame::will(*option)]
        }
        TelnetFrame::Negotiation(NegotiationVerb::Do, option) => vec![TelnetFrame::wont(*option)],
        TelnetFrame::Subnegotiation(..) => match frame.argument() {
            Some(Ok(TelnetArgument::TerminalType(TerminalTypeMessage::Send))) => vec![sb(
                TelnetArgument::TerminalType(TerminalTypeMessage::Is("XTERM".to_string())),
            )],
            Some(Ok(TelnetArgument::TerminalSpeed(TerminalSpeedMessage::Send))) => vec![sb(
                TelnetArgument::TerminalSpeed(TerminalSpeedMessage::is(38400, 38400)),
            )],
            Some(Ok(TelnetArgument::Environment(EnvironmentMessage::Send(_)))) => {
                vec![sb(TelnetArgument::Environment(EnvironmentMessage::Is(vec![
                    EnvironmentVariable::var("USER").with_value("tester"),
                ])))]
            }
            Some(Ok(TelnetArgument::Linemode(LinemodeMessage::Mode(mode)))) if !mode.ack() => {
                vec![sb(TelnetArgument::Linemode(LinemodeMessage::Mode(
                    mode.acknowledged(),
                )))]
            }
            _ => vec![],
        },
        _ => vec![],
    }
}

/// Answers everything the harness sends until it closes, returning the frames seen.
pub async fn conforming_client<S>(mut stream: S) -> Vec<TelnetFrame>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut parser = FrameParser::new();
    let mut seen = Vec::new();
    let mut buf = vec![0u8; 1024];
    loop {
        let count = match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return seen,
            Ok(count) => count,
        };
        for frame in parser.feed(&buf[..count]) {
            for reply in respond(&frame) {
                if stream.write_all(&encode_frame(&reply).unwrap()).await.is_err() {
                    return seen;
                }
            }
            push_coalesced(&mut seen, frame);
        }
    }
}

/// Reads and discards until the harness closes, never answering.
pub async fn silent_client<S>(mut stream: S) -> usize
where
    S: AsyncRead + Unpin,
{
    let mut total = 0;
    let mut buf = vec![0u8; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return total,
            Ok(count) => total += count,
        }
    }
}
