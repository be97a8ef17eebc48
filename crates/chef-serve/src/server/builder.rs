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

//! HTTP server builder.

use mio::net::TcpListener;
use mio::{Interest, Token};
use rustls::ServerConfig;
use slab::Slab;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use tracing::info;

use crate::handler::{Handler, TryIntoHandler};

use super::poller::Poller;
use super::{Error, Result, Server};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Number of events processed per poll.
const EVENTS_CAPACITY: usize = 1024;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server builder.
pub struct Builder<H> {
    /// Handler for incoming requests.
    handler: H,
    /// Socket addresses to bind to.
    addrs: Vec<SocketAddr>,
    /// TLS configuration, if connections should be encrypted.
    tls: Option<Arc<ServerConfig>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Builder<H>
where
    H: Handler,
{
    /// Creates a server builder.
    ///
    /// Note that the canonical way to create a [`Server`] is to invoke the
    /// [`Server::builder`] method, which creates an instance of [`Builder`].
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the handler could not be
    /// created, e.g., because a router contains invalid routes.
    pub fn new<T>(handler: T) -> Result<Self>
    where
        T: TryIntoHandler<Output = H>,
    {
        handler.try_into_handler().map_err(Into::into).map(|handler| Self {
            handler,
            addrs: Vec::new(),
            tls: None,
        })
    }

    /// Adds a socket address to bind to.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use chef_serve::handler::NotFound;
    /// use chef_serve::server::Builder;
    ///
    /// // Create server builder and add address
    /// let builder = Builder::new(NotFound)?.bind("127.0.0.1:0")?;
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn bind<A>(mut self, addr: A) -> Result<Self>
    where
        A: ToSocketAddrs,
    {
        // Resolution might yield the same address several times
        for addr in addr.to_socket_addrs()? {
            if !self.addrs.contains(&addr) {
                self.addrs.push(addr);
            }
        }
        Ok(self)
    }

    /// Enables TLS with the given configuration.
    ///
    /// Requests arriving on TLS connections support pushing resources.
    #[inline]
    #[must_use]
    pub fn tls(mut self, config: Arc<ServerConfig>) -> Self {
        self.tls = Some(config);
        self
    }

    /// Creates the server and binds to the configured addresses.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::NoAddress`], if no address was added, and
    /// [`Error::Io`], if binding to an address fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use chef_serve::handler::NotFound;
    /// use chef_serve::server::Builder;
    ///
    /// // Create server builder and bind to address
    /// let server = Builder::new(NotFound)?
    ///     .bind("127.0.0.1:0")?
    ///     .listen()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn listen(self) -> Result<Server<H>> {
        if self.addrs.is_empty() {
            return Err(Error::NoAddress);
        }

        // Bind listeners to all addresses and register them, using tokens
        // from zero upwards, so connections start right after them
        let poller = Poller::new(EVENTS_CAPACITY)?;
        let iter = self.addrs.into_iter().enumerate();
        let iter = iter.map(|(n, addr)| -> Result<TcpListener> {
            let mut listener = TcpListener::bind(addr)?;
            poller.register(&mut listener, Token(n), Interest::READABLE)?;
            let addr = listener.local_addr()?;
            info!(%addr, tls = self.tls.is_some(), "listening");
            Ok(listener)
        });

        // Collect listeners from iterator and return server
        let acceptors = iter.collect::<Result<Vec<_>>>()?;
        Ok(Server {
            handler: self.handler,
            events: poller,
            start: acceptors.len(),
            acceptors,
            connections: Slab::new(),
            tls: self.tls,
            draining: false,
        })
    }
}
