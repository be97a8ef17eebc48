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

//! HTTP connection.

use mio::net::TcpStream;
use mio::Interest;
use std::io::{self, Cursor, ErrorKind};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

use crate::handler::Handler;
use crate::http::request::Error;
use crate::http::response::ResponseExt;
use crate::http::{Header, Request, Response, Status};

use super::transport::Transport;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Time after which inactive connections are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Connection action after handling an event.
#[derive(Debug)]
pub enum Signal {
    /// Continue with the specified interest.
    Interest(Interest),
    /// Continue without changing the current interest.
    Continue,
    /// Connection was closed.
    Close,
}

// ----------------------------------------------------------------------------

/// Internal buffer state.
#[derive(Debug)]
enum Buffer {
    /// Currently reading a request.
    Reading(Vec<u8>),
    /// Currently writing a response.
    Writing(Cursor<Vec<u8>>),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP connection.
pub struct Connection {
    /// TCP socket.
    socket: TcpStream,
    /// Transport, plain or TLS.
    transport: Transport,
    /// Read/write buffer.
    buffer: Buffer,
    /// Whether to close after the response was written.
    close: bool,
    /// Last activity time.
    time: Instant,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Connection {
    /// Creates a connection.
    pub fn new(socket: TcpStream, transport: Transport) -> Self {
        Connection {
            socket,
            transport,
            buffer: Buffer::Reading(Vec::new()),
            close: false,
            time: Instant::now(),
        }
    }

    /// Returns a mutable reference to the underlying socket.
    pub fn socket(&mut self) -> &mut TcpStream {
        &mut self.socket
    }

    /// Reads data from the socket, and handles the request once complete.
    pub fn read<H>(&mut self, handler: &H) -> Signal
    where
        H: Handler,
    {
        self.time = Instant::now();

        // Requests are only read in between responses - a readable event that
        // arrives while writing is picked up once we reregister for reading
        let Buffer::Reading(buffer) = &mut self.buffer else {
            return Signal::Continue;
        };
        match self.transport.receive(&mut self.socket, buffer) {
            Ok(true) => {}
            Ok(false) => return Signal::Close,
            Err(err) => {
                report(&err);
                return Signal::Close;
            }
        }

        // Handshake records might still need to be written
        if buffer.is_empty() {
            return Signal::Interest(Interest::READABLE);
        }

        // Try to parse and handle the request, or otherwise keep reading
        let (res, close) = match Request::from_bytes(buffer) {
            Ok(req) => {
                let req = req.capability(self.transport.capability());
                debug!(method = %req.method, uri = %req.uri, "request");
                let close = req.is_close();
                (handler.handle(req), close)
            }

            // Request is incomplete, so we keep reading
            Err(Error::Incomplete) => {
                return Signal::Interest(Interest::READABLE);
            }

            // Request is not acceptable, so we answer and close
            Err(Error::Validation(status)) => {
                (Response::from_status(status), true)
            }
            Err(_) => (Response::from_status(Status::BadRequest), true),
        };

        // Switch to writing the response
        self.close = close;
        let bytes = finish(res, close).into_bytes();
        self.buffer = Buffer::Writing(Cursor::new(bytes));
        Signal::Interest(Interest::WRITABLE)
    }

    /// Writes pending data to the socket.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write(&mut self) -> Signal {
        self.time = Instant::now();
        if let Buffer::Writing(cursor) = &mut self.buffer {
            loop {
                let buffer = cursor.get_ref();
                let pos = (cursor.position() as usize).min(buffer.len());
                if pos == buffer.len() {
                    break;
                }

                // Attempt to write remaining bytes
                match self.transport.send(&mut self.socket, &buffer[pos..]) {
                    Ok(0) => return Signal::Close,
                    Ok(n) => cursor.set_position((pos + n) as u64),
                    Err(err) if err.kind() == ErrorKind::WouldBlock => {
                        return Signal::Continue;
                    }
                    Err(err) if err.kind() == ErrorKind::Interrupted => {}
                    Err(err) => {
                        report(&err);
                        return Signal::Close;
                    }
                }
            }
        }

        // Encrypted records might still be pending
        match self.transport.flush(&mut self.socket) {
            Ok(true) => {}
            Ok(false) => return Signal::Continue,
            Err(err) => {
                report(&err);
                return Signal::Close;
            }
        }

        // If we only flushed records, there's no response to complete
        if matches!(self.buffer, Buffer::Reading(_)) {
            return Signal::Interest(Interest::READABLE);
        }

        // Response was written completely, so honor the client's wish to close
        // the connection, or switch back to reading the next request
        if self.close {
            self.transport.close(&mut self.socket);
            return Signal::Close;
        }
        self.buffer = Buffer::Reading(Vec::new());
        Signal::Interest(Interest::READABLE)
    }

    /// Closes the connection, notifying the peer if necessary.
    pub fn close(&mut self) {
        self.transport.close(&mut self.socket);
    }
}

#[allow(clippy::must_use_candidate)]
impl Connection {
    /// Returns whether the connection has data to write.
    pub fn is_writing(&self) -> bool {
        matches!(self.buffer, Buffer::Writing(_))
            || self.transport.wants_write()
    }

    /// Returns whether the connection is in the middle of an exchange.
    ///
    /// Connections are busy while negotiating, after a request was partially
    /// read, and until the response was written completely.
    pub fn is_busy(&self) -> bool {
        match &self.buffer {
            Buffer::Reading(buffer) => {
                !buffer.is_empty()
                    || self.transport.is_handshaking()
                    || self.transport.wants_write()
            }
            Buffer::Writing(_) => true,
        }
    }

    /// Returns whether the connection has been inactive for too long.
    pub fn is_timed_out(&self, now: Instant) -> bool {
        now.duration_since(self.time) > IDLE_TIMEOUT
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Adds the headers every response must carry.
fn finish(mut res: Response, close: bool) -> Response {
    if !res.headers.contains(Header::Date) {
        let date = httpdate::fmt_http_date(SystemTime::now());
        res.headers.insert(Header::Date, date);
    }
    if close {
        res.headers.insert(Header::Connection, "close");
    }
    res
}

/// Reports a connection error, unless it's expected.
fn report(err: &io::Error) {
    match err.kind() {
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => {}
        _ => warn!(%err, "connection error"),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_adds_date() {
        let res = finish(Response::new(), false);
        assert!(res.headers.contains(Header::Date));
        assert!(!res.headers.contains(Header::Connection));
    }

    #[test]
    fn test_finish_adds_close() {
        let res = finish(Response::new(), true);
        assert_eq!(res.headers.get(Header::Connection), Some("close"));
    }
}
