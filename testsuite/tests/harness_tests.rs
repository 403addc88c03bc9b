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


mod common;

use bytes::Bytes;
use iacprobe_telnetcodec::{TelnetCommand, TelnetFrame, TelnetOption};
use iacprobe_testsuite::{
    HarnessConfig, HarnessError, HarnessListener, ScriptKind, SequencerState, StepOutcome,
    Verdict, run,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;

fn loopback(script: ScriptKind) -> HarnessConfig {
    HarnessConfig::for_script(script)
        .with_bind_address(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .with_response_timeout(Duration::from_secs(5))
        .with_grace_period(Duration::from_millis(50))
        .with_accept_timeout(Some(Duration::from_secs(5)))
}

fn verdict(outcome: &StepOutcome) -> Option<&Verdict> {
    match outcome {
        StepOutcome::Matched { verdict, .. } => verdict.as_ref(),
        _ => None,
    }
}

#[tokio::test]
async fn basic_script_against_conforming_client() {
    let config = loopback(ScriptKind::Basic);
    let listener = HarnessListener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        common::conforming_client(stream).await
    });

    let script = config.script.build(config.response_timeout);
    let report = run(&listener, &script).await.unwrap();

    assert!(report.passed(), "{report}");
    assert_eq!(report.steps.len(), script.len());
    assert_eq!(
        report.steps[5].outcome,
        StepOutcome::Matched {
            frames: vec![TelnetFrame::data(&b"[Yes]\r\n"[..])],
            verdict: None,
        }
    );
    assert_eq!(
        report.steps[7].outcome,
        StepOutcome::Matched {
            frames: vec![TelnetFrame::do_(TelnetOption::Echo)],
            verdict: None,
        }
    );
    assert!(report.anomalies.is_empty());

    let seen = client.await.unwrap();
    assert_eq!(
        seen,
        vec![
            TelnetFrame::data(&b"Welcome to Telnet Test Server\r\n"[..]),
            TelnetFrame::Command(TelnetCommand::NoOperation),
            TelnetFrame::data(&b"Hello\xFFWorld\r\n"[..]),
            TelnetFrame::Command(TelnetCommand::AreYouThere),
            TelnetFrame::will(TelnetOption::Echo),
            TelnetFrame::data(&b"Line1\r\0Line2\r\nLine3\r\nLine4\r\n"[..]),
        ]
    );
}

#[tokio::test]
async fn subnegotiation_script_against_conforming_client() {
    let config = loopback(ScriptKind::Subnegotiation);
    let listener = HarnessListener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        common::conforming_client(stream).await
    });

    let script = config.script.build(config.response_timeout);
    let report = run(&listener, &script).await.unwrap();
    assert!(report.passed(), "{report}");

    let verdicts: Vec<&Verdict> = report
        .steps
        .iter()
        .filter_map(|step| verdict(&step.outcome))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            &Verdict::Pass("window 80x24".to_string()),
            &Verdict::Pass("terminal type XTERM".to_string()),
            &Verdict::Pass("terminal speed 38400,38400".to_string()),
            &Verdict::Pass("environment [VAR USER=\"tester\"]".to_string()),
            &Verdict::Pass("mode EDIT|ACK".to_string()),
        ]
    );

    let seen = client.await.unwrap();
    assert!(seen.contains(&TelnetFrame::Subnegotiation(
        TelnetOption::TTYPE,
        Bytes::from_static(&[1]),
    )));
    assert_eq!(
        seen.last(),
        Some(&TelnetFrame::data(&b"\r\nAll subnegotiations sent!\r\n"[..]))
    );
}

#[tokio::test]
async fn silent_client_misses_every_expectation() {
    let config = loopback(ScriptKind::Basic).with_response_timeout(Duration::from_millis(100));
    let listener = HarnessListener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        common::silent_client(stream).await
    });

    let script = config.script.build(config.response_timeout);
    let report = run(&listener, &script).await.unwrap();

    assert!(report.is_complete());
    assert!(!report.passed());
    let missed: Vec<&str> = report.failures().map(|step| step.label.as_str()).collect();
    assert_eq!(missed, vec!["reply to AYT", "reply to WILL ECHO"]);
    assert_eq!(client.await.unwrap() as u64, report.bytes_sent);
}

#[tokio::test]
async fn client_hangup_aborts_the_run() {
    let config = loopback(ScriptKind::Basic);
    let listener = HarnessListener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        drop(stream);
    });

    let script = config.script.build(config.response_timeout);
    let report = run(&listener, &script).await.unwrap();

    match report.state {
        SequencerState::Aborted { step } => assert!(step <= 5, "aborted at {step}"),
        state => panic!("expected an aborted run, got {state}"),
    }
    assert!(!report.passed());
}

#[tokio::test]
async fn accept_gives_up_without_a_client() {
    let config = loopback(ScriptKind::Basic).with_accept_timeout(Some(Duration::from_millis(50)));
    let listener = HarnessListener::bind(&config).await.unwrap();
    let script = config.script.build(config.response_timeout);

    let error = run(&listener, &script).await.unwrap_err();
    assert!(matches!(error, HarnessError::AcceptTimeout(limit) if limit == Duration::from_millis(50)));
}
