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
// ----------------------------------------------------------------------------

//! Service lifecycle.

use chef_serve::handler::TryIntoHandler;
use chef_serve::server::Server;
use crossbeam::channel::{Receiver, Sender, bounded};
use mio::Waker;
use rustls::ServerConfig;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::config::Config;
use super::tls;

mod error;
pub mod ready;

pub use error::{Error, Result};
use ready::Notifier;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Interval in which stale connections are swept.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time in which in-flight requests may complete after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Service.
///
/// A service owns a configuration and a factory for the handler, and runs a
/// [`Server`] on the thread calling [`Service::run`]. The handler is created
/// on that very thread, which is why it doesn't need to be [`Send`], but the
/// factory does. Running a service moves it from created to running, and
/// [`Service::quit`] moves it to stopped, after which it can't be restarted.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef::{Config, Service};
/// use chef_serve::handler::NotFound;
/// use std::sync::Arc;
///
/// // Create service listening on a free port
/// let config = Config {
///     host: String::from("127.0.0.1"),
///     port: 0,
///     ..Config::default()
/// };
/// let service = Arc::new(Service::new(config, || NotFound)?);
///
/// // Start service and stop it again
/// let (addr, handle) = service.spawn()?;
/// assert_ne!(addr.port(), 0);
/// service.quit()?;
/// handle.join().expect("thread")?;
/// # Ok(())
/// # }
/// ```
pub struct Service<F> {
    /// Configuration.
    config: Config,
    /// TLS settings, if any.
    tls: Option<Arc<ServerConfig>>,
    /// Handler factory.
    factory: F,
    /// Whether the service was started.
    started: AtomicBool,
    /// Whether the service is running.
    running: AtomicBool,
    /// Whether shutdown was requested.
    stopping: AtomicBool,
    /// Waker of the serving thread's event loop.
    waker: OnceLock<Arc<Waker>>,
    /// Sender dropped when the serving thread is done.
    done_tx: Mutex<Option<Sender<()>>>,
    /// Receiver released when the serving thread is done.
    done_rx: Receiver<()>,
}

/// Guard held by the serving thread.
///
/// Dropping the guard clears the running flag before releasing the
/// completion sender, which also happens when a handler panics.
struct Serving<'a> {
    /// Whether the service is running.
    running: &'a AtomicBool,
    /// Sender dropped when the serving thread is done.
    _done: Option<Sender<()>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<F, T> Service<F>
where
    F: Fn() -> T,
    T: TryIntoHandler,
{
    /// Creates a service.
    ///
    /// TLS settings are assembled right away, since a configuration naming a
    /// broken key pair must never result in a running service.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Tls`], if the key pair is incomplete or
    /// can't be loaded.
    pub fn new(config: Config, factory: F) -> Result<Self> {
        let tls = tls::server_config(&config)?;
        info!(
            host = %config.host,
            port = config.port,
            tls = tls.is_some(),
            "configured service"
        );

        // Create completion signal, which fires when the sender is dropped
        let (done_tx, done_rx) = bounded(0);
        Ok(Self {
            config,
            tls,
            factory,
            started: AtomicBool::new(false),
            running: AtomicBool::new(false),
            stopping: AtomicBool::new(false),
            waker: OnceLock::new(),
            done_tx: Mutex::new(Some(done_tx)),
            done_rx,
        })
    }

    /// Creates a service from the configuration file at the given path.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Config`], if the configuration can't be
    /// loaded, and [`Error::Tls`] as described in [`Service::new`].
    pub fn load<P>(path: P, factory: F) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::new(Config::load(path)?, factory)
    }

    /// Runs the service on the current thread until it's stopped.
    ///
    /// Once the server is listening, the given notifier is fired with the
    /// bound address. If binding fails, the notifier is dropped, releasing
    /// the waiting side, and the error is returned.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::AlreadyStarted`], if the service was
    /// started before, and [`Error::Server`], if the handler can't be created
    /// or the server fails.
    pub fn run(&self, notifier: Notifier) -> Result {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyStarted);
        }

        // Keep the completion sender alive for as long as we're serving, so
        // it's dropped when leaving, no matter how we leave
        let guard = Serving {
            running: &self.running,
            _done: self.done_tx.lock().ok().and_then(|mut done| done.take()),
        };
        let res = self.serve(notifier);
        drop(guard);

        // Report outcome
        match &res {
            Ok(()) => info!("service stopped"),
            Err(err) => warn!(%err, "service failed"),
        }
        res
    }

    /// Serves requests until shutdown was requested and connections drained.
    fn serve(&self, notifier: Notifier) -> Result {
        let mut builder = Server::builder((self.factory)())?;
        builder = builder.bind(self.config.addr())?;
        if let Some(tls) = &self.tls {
            builder = builder.tls(Arc::clone(tls));
        }

        // Start listening, and make the event loop reachable for shutdown
        // before anyone learns that we're running
        let mut server = builder.listen()?;
        let addr = server.local_addr()?;
        let _ = self.waker.set(server.waker());
        self.running.store(true, Ordering::SeqCst);
        info!(%addr, "service running");
        notifier.notify(addr);

        // Serve until shutdown is requested
        while !self.stopping.load(Ordering::SeqCst) {
            server.poll(Some(POLL_INTERVAL))?;
        }

        // Stop accepting, and give in-flight requests time to complete
        server.shutdown()?;
        let deadline = Instant::now() + DRAIN_TIMEOUT;
        while !server.is_idle() {
            let now = Instant::now();
            if now >= deadline {
                warn!("drain window elapsed, dropping connections");
                break;
            }
            server.poll(Some(deadline - now))?;
        }

        // Connections drained
        Ok(())
    }
}

impl<F, T> Service<F>
where
    F: Fn() -> T + Send + Sync + 'static,
    T: TryIntoHandler,
{
    /// Runs the service on a new thread, and waits until it's listening.
    ///
    /// # Errors
    ///
    /// This method returns the error of [`Service::run`], if the service
    /// stopped before it was listening.
    pub fn spawn(self: &Arc<Self>) -> Result<(SocketAddr, JoinHandle<Result>)> {
        let (notifier, listener) = ready::channel();
        let handle = thread::spawn({
            let service = Arc::clone(self);
            move || service.run(notifier)
        });

        // Wait for the service, and surface its error if it never got ready
        match listener.wait() {
            Ok(addr) => Ok((addr, handle)),
            Err(err) => match handle.join() {
                Ok(Err(err)) => Err(err),
                _ => Err(err.into()),
            },
        }
    }
}

impl<F> Service<F> {
    /// Stops the service and blocks until the serving thread is done.
    ///
    /// Calling this method on a service that is not running does nothing,
    /// which makes it safe to call more than once.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`], if the event loop can't be woken.
    pub fn quit(&self) -> Result {
        if !self.running.load(Ordering::SeqCst) {
            debug!("service not running");
            return Ok(());
        }

        // Request shutdown, and interrupt polling
        self.stopping.store(true, Ordering::SeqCst);
        if let Some(waker) = self.waker.get() {
            waker.wake()?;
        }

        // Nothing is ever sent, so this returns once the sender is dropped
        let _ = self.done_rx.recv();
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Returns whether the service is running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<F> fmt::Debug for Service<F> {
    /// Formats the service for debugging.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .field("tls", &self.tls.is_some())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Drop for Serving<'_> {
    /// Clears the running flag.
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
