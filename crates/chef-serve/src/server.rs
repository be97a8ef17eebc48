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

//! HTTP server.

use mio::net::TcpListener;
use mio::{Interest, Token, Waker};
use rustls::{ServerConfig, ServerConnection};
use slab::Slab;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::handler::{Handler, TryIntoHandler};

mod builder;
mod connection;
mod error;
mod poller;
mod transport;

pub use builder::Builder;
use connection::{Connection, Signal};
pub use error::{Error, Result};
use poller::{Poller, WAKER};
use transport::Transport;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server.
///
/// The server drives all connections from a single thread, which calls
/// [`Server::poll`] in a loop. Connections are plain, or TLS if the server
/// was built with a TLS configuration, in which case requests are stamped
/// as pushable. Other threads can interrupt polling with the [`Waker`], e.g.,
/// to initiate a [`Server::shutdown`].
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::http::{Request, Response};
/// use chef_serve::router::{Params, Router};
/// use chef_serve::server::Server;
///
/// // Create router
/// let router = Router::new()
///     .get("/valid", |_req: Request, _params: Params| Response::new());
///
/// // Create server on a free port
/// let server = Server::new(router, "127.0.0.1:0")?;
/// assert!(server.local_addr().is_ok());
/// # Ok(())
/// # }
/// ```
pub struct Server<H>
where
    H: Handler,
{
    /// Handler for incoming requests.
    handler: H,
    /// Poller for I/O events.
    events: Poller,
    /// Acceptors for incoming connections.
    acceptors: Vec<TcpListener>,
    /// Token of the first connection.
    start: usize,
    /// HTTP connections.
    connections: Slab<Connection>,
    /// TLS configuration, if any.
    tls: Option<Arc<ServerConfig>>,
    /// Whether the server is shutting down.
    draining: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Server<H>
where
    H: Handler,
{
    /// Creates a server bound to the given address.
    #[inline]
    pub fn new<T, A>(handler: T, addr: A) -> Result<Self>
    where
        T: TryIntoHandler<Output = H>,
        A: ToSocketAddrs,
    {
        Self::builder(handler)?.bind(addr)?.listen()
    }

    /// Creates a server builder.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use chef_serve::handler::NotFound;
    /// use chef_serve::server::Server;
    ///
    /// // Create server builder
    /// let builder = Server::builder(NotFound)?;
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn builder<T>(handler: T) -> Result<Builder<H>>
    where
        T: TryIntoHandler<Output = H>,
    {
        Builder::new(handler)
    }

    /// Polls the server for events and processes them.
    ///
    /// This method blocks until at least one event arrived, the server was
    /// woken up, or the timeout elapsed. Connections that were inactive for
    /// too long are closed, and so are idle ones when shutting down.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Result {
        self.events.poll(timeout)?;

        // Collect events, so we can process them with mutable access
        let events: Vec<_> = self
            .events
            .iter()
            .map(|event| {
                let readable = event.is_readable()
                    || event.is_read_closed()
                    || event.is_error();
                (event.token(), readable, event.is_writable())
            })
            .collect();

        // Handle events - the waker only interrupts polling
        for (token, readable, writable) in events {
            if token == WAKER {
                continue;
            }

            // Check if the event is for an acceptor or a connection
            let n: usize = token.into();
            if n < self.start {
                self.accept(n)?;
                continue;
            }
            let key = n - self.start;
            if readable {
                if let Some(conn) = self.connections.get_mut(key) {
                    let signal = conn.read(&self.handler);
                    self.apply(key, signal)?;
                }
            }
            if writable {
                if let Some(conn) = self.connections.get_mut(key) {
                    let signal = conn.write();
                    self.apply(key, signal)?;
                }
            }
        }

        // Close connections after processing events, so exchanges that just
        // completed while shutting down don't linger until the next wakeup
        let now = Instant::now();
        let stale: Vec<_> = self
            .connections
            .iter()
            .filter(|(_, conn)| {
                conn.is_timed_out(now) || (self.draining && !conn.is_busy())
            })
            .map(|(key, _)| key)
            .collect();
        for key in stale {
            self.close(key)?;
        }

        // No errors occurred
        Ok(())
    }

    /// Stops accepting connections and closes idle ones.
    ///
    /// Busy connections are served until they're done, as long as the server
    /// is polled, which is what [`Server::is_idle`] can be used for.
    pub fn shutdown(&mut self) -> Result {
        for mut acceptor in self.acceptors.drain(..) {
            self.events.deregister(&mut acceptor)?;
        }
        self.draining = true;

        // Close all connections that are not in the middle of an exchange
        let idle: Vec<_> = self
            .connections
            .iter()
            .filter(|(_, conn)| !conn.is_busy())
            .map(|(key, _)| key)
            .collect();
        for key in idle {
            self.close(key)?;
        }

        // Report what's left
        debug!(connections = self.connections.len(), "shutting down");
        Ok(())
    }

    /// Returns the address of the first acceptor.
    ///
    /// This is handy when binding to port `0`, which picks a free port.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let acceptor = self.acceptors.first().ok_or(Error::NoAddress)?;
        acceptor.local_addr().map_err(Into::into)
    }

    /// Returns the waker for interrupting polling from other threads.
    #[inline]
    #[must_use]
    pub fn waker(&self) -> Arc<Waker> {
        self.events.waker()
    }

    /// Accepts all pending connections of the given acceptor.
    fn accept(&mut self, n: usize) -> Result {
        let Some(acceptor) = self.acceptors.get(n) else {
            return Ok(());
        };

        // Browsers might open several connections at once
        loop {
            let (mut socket, addr) = match acceptor.accept() {
                Ok(accepted) => accepted,
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(%err, "could not accept connection");
                    break;
                }
            };

            // Sessions only fail to be created for unusable configurations
            let transport = match &self.tls {
                Some(config) => {
                    let tls = ServerConnection::new(Arc::clone(config))?;
                    Transport::Tls(Box::new(tls))
                }
                None => Transport::Plain,
            };

            // Register connection with the next free token
            let entry = self.connections.vacant_entry();
            let token = Token(self.start + entry.key());
            self.events.register(&mut socket, token, Interest::READABLE)?;
            entry.insert(Connection::new(socket, transport));
            trace!(%addr, "accepted connection");
        }

        // No errors occurred
        Ok(())
    }

    /// Applies the signal of a connection after reading or writing.
    fn apply(&mut self, key: usize, signal: Signal) -> Result {
        match signal {
            Signal::Interest(mut interest) => {
                let conn = &mut self.connections[key];
                if self.draining && !conn.is_busy() {
                    return self.close(key);
                }
                if conn.is_writing() {
                    interest |= Interest::WRITABLE;
                }
                let token = Token(self.start + key);
                self.events.reregister(conn.socket(), token, interest)
            }
            Signal::Close => self.close(key),
            Signal::Continue => Ok(()),
        }
    }

    /// Closes and deregisters the given connection.
    fn close(&mut self, key: usize) -> Result {
        let Some(mut conn) = self.connections.try_remove(key) else {
            return Ok(());
        };
        conn.close();
        self.events.deregister(conn.socket())
    }
}

#[allow(clippy::must_use_candidate)]
impl<H> Server<H>
where
    H: Handler,
{
    /// Returns whether connections are encrypted.
    #[inline]
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Returns whether no connections are left.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.connections.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;

    use crate::http::response::ResponseExt;
    use crate::http::{Request, Response, Writer};
    use crate::push;
    use crate::router::{Params, Router};

    use super::*;

    /// Sends a request and reads the response until the server closes.
    fn fetch(
        addr: SocketAddr, path: &'static str,
    ) -> thread::JoinHandle<String> {
        thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            let req = format!(
                "GET {path} HTTP/1.1\r\nHost: localhost\r\n\
                 Connection: close\r\n\r\n"
            );
            stream.write_all(req.as_bytes()).unwrap();
            let mut res = String::new();
            stream.read_to_string(&mut res).unwrap();
            res
        })
    }

    fn server() -> Server<impl Handler> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let router = Router::new()
            .get("/valid", |_req: Request, _params: Params| {
                Response::from_text("valid")
            })
            .get("/push", |req: Request, _params: Params| {
                let mut writer = Writer::new(&req);
                writer.response = Response::from_text("push");
                let res = push::push_files(&mut writer, ["/style.css"]);
                assert!(matches!(res, Err(push::Error::Unsupported)));
                writer
            });
        Server::new(router, "127.0.0.1:0").unwrap()
    }

    #[test]
    fn test_plain_requests() {
        let mut server = server();
        let addr = server.local_addr().unwrap();
        assert!(!server.is_tls());

        for (path, status) in [("/valid", "200 OK"), ("/invalid", "404")] {
            let client = fetch(addr, path);
            while !client.is_finished() {
                server.poll(Some(Duration::from_millis(10))).unwrap();
            }
            let res = client.join().unwrap();
            assert!(res.starts_with(&format!("HTTP/1.1 {status}")));
            assert!(res.contains("Date: "));
            assert!(res.contains("Connection: close"));
        }
    }

    #[test]
    fn test_plain_connections_cannot_push() {
        let mut server = server();
        let client = fetch(server.local_addr().unwrap(), "/push");
        while !client.is_finished() {
            server.poll(Some(Duration::from_millis(10))).unwrap();
        }
        let res = client.join().unwrap();
        assert!(res.starts_with("HTTP/1.1 200 OK"));
        assert!(!res.contains("Link: "));
    }

    #[test]
    fn test_shutdown_without_connections() {
        let mut server = server();
        server.shutdown().unwrap();
        assert!(server.is_idle());
        assert!(matches!(server.local_addr(), Err(Error::NoAddress)));
    }
}
