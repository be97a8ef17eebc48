// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Connection transport.

use mio::net::TcpStream;
use rustls::ServerConnection;
use std::io::{self, ErrorKind, Read, Write};

use crate::http::Capability;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Connection transport.
///
/// Plain connections write straight to the socket, while TLS connections move
/// bytes through a [`ServerConnection`], which encrypts and decrypts records
/// and might need to write to the socket on its own, e.g., during handshakes.
/// TLS is the only transport on which pushing resources is supported.
pub enum Transport {
    /// Plain TCP.
    Plain,
    /// TLS session.
    Tls(Box<ServerConnection>),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Transport {
    /// Returns the capability of connections using the transport.
    pub fn capability(&self) -> Capability {
        match self {
            Transport::Plain => Capability::Basic,
            Transport::Tls(_) => Capability::Pushable,
        }
    }

    /// Reads all available data from the socket into the buffer.
    ///
    /// Returns `false` if the peer closed the connection.
    pub fn receive(
        &mut self, socket: &mut TcpStream, buffer: &mut Vec<u8>,
    ) -> io::Result<bool> {
        match self {
            Transport::Plain => receive_plain(socket, buffer),
            Transport::Tls(tls) => receive_tls(tls, socket, buffer),
        }
    }

    /// Writes data, returning how many bytes were accepted.
    ///
    /// For TLS, data is accepted once it's encrypted, so [`Transport::flush`]
    /// must be called until it reports that all records were written.
    pub fn send(
        &mut self, socket: &mut TcpStream, data: &[u8],
    ) -> io::Result<usize> {
        let Transport::Tls(tls) = self else {
            return socket.write(data);
        };
        loop {
            let n = tls.writer().write(data)?;
            let flushed = flush_tls(tls, socket)?;
            if n > 0 || data.is_empty() {
                return Ok(n);
            }

            // Nothing was accepted, so the session buffer is full
            if !flushed {
                return Err(ErrorKind::WouldBlock.into());
            }
        }
    }

    /// Writes pending TLS records to the socket.
    ///
    /// Returns `false` if the socket would block before all were written.
    pub fn flush(&mut self, socket: &mut TcpStream) -> io::Result<bool> {
        match self {
            Transport::Plain => Ok(true),
            Transport::Tls(tls) => flush_tls(tls, socket),
        }
    }

    /// Closes the transport, notifying the peer if necessary.
    pub fn close(&mut self, socket: &mut TcpStream) {
        if let Transport::Tls(tls) = self {
            tls.send_close_notify();
            let _ = flush_tls(tls, socket);
        }
    }
}

#[allow(clippy::must_use_candidate)]
impl Transport {
    /// Returns whether there are records waiting to be written.
    #[inline]
    pub fn wants_write(&self) -> bool {
        match self {
            Transport::Plain => false,
            Transport::Tls(tls) => tls.wants_write(),
        }
    }

    /// Returns whether the transport is still negotiating.
    #[inline]
    pub fn is_handshaking(&self) -> bool {
        match self {
            Transport::Plain => false,
            Transport::Tls(tls) => tls.is_handshaking(),
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Reads from a plain socket until it would block.
fn receive_plain(
    socket: &mut TcpStream, buffer: &mut Vec<u8>,
) -> io::Result<bool> {
    let mut temp = [0u8; 4096];
    loop {
        match socket.read(&mut temp) {
            Ok(0) => return Ok(false),
            Ok(n) => buffer.extend_from_slice(&temp[..n]),
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                return Ok(true);
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

/// Reads TLS records until the socket would block, decrypting as we go.
fn receive_tls(
    tls: &mut ServerConnection, socket: &mut TcpStream, buffer: &mut Vec<u8>,
) -> io::Result<bool> {
    loop {
        match tls.read_tls(socket) {
            Ok(0) => return Ok(false),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                return Ok(true);
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }

        // Records must be processed after every read, or rustls refuses to
        // buffer more. On errors, the alert must still reach the peer.
        let state = match tls.process_new_packets() {
            Ok(state) => state,
            Err(err) => {
                let _ = flush_tls(tls, socket);
                return Err(io::Error::new(ErrorKind::InvalidData, err));
            }
        };

        // Move decrypted data into the buffer
        let n = state.plaintext_bytes_to_read();
        if n > 0 {
            let start = buffer.len();
            buffer.resize(start + n, 0);
            tls.reader().read_exact(&mut buffer[start..])?;
        }
        if state.peer_has_closed() {
            return Ok(false);
        }
    }
}

/// Writes TLS records until none are left or the socket would block.
fn flush_tls(
    tls: &mut ServerConnection, socket: &mut TcpStream,
) -> io::Result<bool> {
    while tls.wants_write() {
        match tls.write_tls(socket) {
            Ok(0) => return Err(ErrorKind::WriteZero.into()),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                return Ok(false);
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}
