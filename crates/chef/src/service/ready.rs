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

//! Readiness signal.
//!
//! The signal fires once: the [`Notifier`] is consumed when the service is
//! listening, and the [`Listener`] is consumed when waiting for it, so
//! neither side can be used twice. If the notifier is dropped without
//! firing, e.g., because binding failed, the listener is released with
//! [`Error::Disconnected`] instead of blocking forever.

use crossbeam::channel::{RecvTimeoutError, Receiver, Sender, bounded};
use std::net::SocketAddr;
use std::result;
use std::time::Duration;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Sending side of the readiness signal.
#[derive(Debug)]
pub struct Notifier {
    /// Channel sender.
    sender: Sender<SocketAddr>,
}

/// Receiving side of the readiness signal.
#[derive(Debug)]
pub struct Listener {
    /// Channel receiver.
    receiver: Receiver<SocketAddr>,
}

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Readiness error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Notifier was dropped without firing.
    #[error("service stopped before it was ready")]
    Disconnected,

    /// Signal did not fire in time.
    #[error("timed out waiting for service")]
    Timeout,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Notifier {
    /// Signals that the service is listening on the given address.
    pub fn notify(self, addr: SocketAddr) {
        // The buffer holds exactly one address, so this never blocks, and if
        // nobody's waiting anymore, there's nobody to tell
        let _ = self.sender.send(addr);
    }
}

impl Listener {
    /// Blocks until the service is listening, and returns its address.
    pub fn wait(self) -> Result<SocketAddr> {
        self.receiver.recv().map_err(|_| Error::Disconnected)
    }

    /// Blocks until the service is listening or the timeout elapsed.
    pub fn wait_timeout(self, timeout: Duration) -> Result<SocketAddr> {
        self.receiver
            .recv_timeout(timeout)
            .map_err(|err| match err {
                RecvTimeoutError::Timeout => Error::Timeout,
                RecvTimeoutError::Disconnected => Error::Disconnected,
            })
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates a readiness signal.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef::service::ready;
///
/// // Create signal and fire it
/// let (notifier, listener) = ready::channel();
/// notifier.notify("127.0.0.1:8080".parse()?);
/// assert_eq!(listener.wait()?.port(), 8080);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn channel() -> (Notifier, Listener) {
    let (sender, receiver) = bounded(1);
    (Notifier { sender }, Listener { receiver })
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Readiness result.
pub type Result<T = ()> = result::Result<T, Error>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_notify_across_threads() {
        let (notifier, listener) = channel();
        let addr: SocketAddr = "127.0.0.1:4000".parse().expect("address");
        let handle = thread::spawn(move || notifier.notify(addr));
        assert_eq!(listener.wait(), Ok(addr));
        handle.join().expect("thread");
    }

    #[test]
    fn test_dropped_notifier() {
        let (notifier, listener) = channel();
        drop(notifier);
        assert_eq!(listener.wait(), Err(Error::Disconnected));
    }

    #[test]
    fn test_timeout() {
        let (_notifier, listener) = channel();
        let res = listener.wait_timeout(Duration::from_millis(10));
        assert_eq!(res, Err(Error::Timeout));
    }

    #[test]
    fn test_notify_without_listener() {
        let (notifier, listener) = channel();
        drop(listener);
        notifier.notify("127.0.0.1:4000".parse().expect("address"));
    }
}
