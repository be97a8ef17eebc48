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

//! Connection capability.

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Connection capability.
///
/// Every connection can answer requests, but only some can additionally push
/// resources to the client. Which one applies is decided once, when the
/// connection is negotiated, and is then attached to every [`Request`][] that
/// arrives on it. The [`Writer`][] created for a request derives its pusher
/// from this tag, so nothing downstream ever needs to inspect the transport.
///
/// [`Request`]: crate::http::Request
/// [`Writer`]: crate::http::Writer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Capability {
    /// Connection can write responses.
    #[default]
    Basic,
    /// Connection can write responses and push resources.
    Pushable,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Capability {
    /// Returns whether pushing resources is supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::Capability;
    ///
    /// // Check capabilities
    /// assert!(Capability::Pushable.is_pushable());
    /// assert!(!Capability::Basic.is_pushable());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_pushable(self) -> bool {
        matches!(self, Capability::Pushable)
    }
}
