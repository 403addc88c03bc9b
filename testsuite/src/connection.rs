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


//! Connection shell: a single accepted client with bounded reads and writes.

use crate::error::is_disconnect;
use crate::{HarnessConfig, HarnessError, Result, ScriptPayload, hexdump};
use bytes::{Bytes, BytesMut};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info, instrument, trace};

/// Result of one bounded read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes arrived before the deadline
    Data(Bytes),
    /// The deadline passed with nothing read
    TimedOut,
    /// The peer closed its side
    Closed,
}

/// Listens for the one client a run talks to.
#[derive(Debug)]
pub struct HarnessListener {
    listener: TcpListener,
    config: HarnessConfig,
}

impl HarnessListener {
    /// Bind to `config.bind_address`.
    pub async fn bind(config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_address).await?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(HarnessListener {
            listener,
            config: config.clone(),
        })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Configuration the listener was bound with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Wait for a client, bounded by the configured accept timeout.
    pub async fn accept(&self) -> Result<Connection<TcpStream>> {
        let (stream, peer) = match self.config.accept_timeout {
            Some(limit) => timeout(limit, self.listener.accept())
                .await
                .map_err(|_| HarnessError::AcceptTimeout(limit))??,
            None => self.listener.accept().await?,
        };
        stream.set_nodelay(true)?;
        info!("Connection from {}", peer);
        Ok(Connection::new(stream, &self.config).with_peer(peer))
    }
}

///
/// One client connection.
///
/// Generic over the stream so the sequencer can be driven by an in-memory duplex pipe in
/// tests. Reads always carry a deadline and writes a timeout, so a silent or stalled peer
/// never blocks the harness indefinitely.
///
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
    write_timeout: Duration,
    read_chunk: usize,
    read_buffer: BytesMut,
    bytes_sent: u64,
    bytes_received: u64,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a connected stream.
    pub fn new(stream: S, config: &HarnessConfig) -> Self {
        Connection {
            stream,
            peer: None,
            write_timeout: config.write_timeout,
            read_chunk: config.read_chunk.max(1),
            read_buffer: BytesMut::new(),
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    /// Record the peer address for logging.
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Peer address, when known.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Total bytes written.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Total bytes read.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Write a payload and flush it, returning the bytes written.
    #[instrument(level = "debug", skip_all)]
    pub async fn send(&mut self, payload: &ScriptPayload) -> Result<Bytes> {
        let bytes = payload.to_bytes()?;
        trace!("Sending {} bytes\n{}", bytes.len(), hexdump::format(&bytes, "  >> "));
        let stream = &mut self.stream;
        let write = async {
            stream.write_all(&bytes).await?;
            stream.flush().await
        };
        match timeout(self.write_timeout, write).await {
            Err(_) => Err(HarnessError::Timeout),
            Ok(Err(error)) if is_disconnect(error.kind()) => Err(HarnessError::ConnectionClosed),
            Ok(Err(error)) => Err(error.into()),
            Ok(Ok(())) => {
                self.bytes_sent += bytes.len() as u64;
                Ok(bytes)
            }
        }
    }

    /// Read whatever arrives before `deadline`.
    pub async fn read_until(&mut self, deadline: Instant) -> Result<ReadOutcome> {
        self.read_buffer.clear();
        self.read_buffer.reserve(self.read_chunk);
        match timeout_at(deadline, self.stream.read_buf(&mut self.read_buffer)).await {
            Err(_) => Ok(ReadOutcome::TimedOut),
            Ok(Ok(0)) => {
                debug!("Peer closed the connection");
                Ok(ReadOutcome::Closed)
            }
            Ok(Ok(count)) => {
                self.bytes_received += count as u64;
                let bytes = self.read_buffer.split().freeze();
                trace!("Received {} bytes\n{}", count, hexdump::format(&bytes, "  << "));
                Ok(ReadOutcome::Data(bytes))
            }
            Ok(Err(error)) if is_disconnect(error.kind()) => {
                debug!("Peer dropped the connection: {}", error);
                Ok(ReadOutcome::Closed)
            }
            Ok(Err(error)) => Err(error.into()),
        }
    }

    /// Shut down the write side.
    pub async fn close(&mut self) -> Result<()> {
        match self.stream.shutdown().await {
            Err(error) if !is_disconnect(error.kind()) => Err(error.into()),
            _ => Ok(()),
        }
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}
