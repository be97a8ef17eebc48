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

//! Preload pusher.

use percent_encoding::utf8_percent_encode;
use std::path::Path;
use std::result;

use crate::http::request::PATH;
use crate::http::{Header, Response};

use super::error::Rejection;
use super::Pusher;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Preload pusher.
///
/// This pusher announces pushed resources with preload links, which is the
/// form of server push every HTTP/1.1 client understands. Targets must be
/// absolute paths without control characters, and are collected until the
/// response is finished, at which point a `Link` header is added for each of
/// them. Pushing the same target twice announces it once.
///
/// [`push_files`][super::push_files] hands over normalized server paths, so
/// clients see the server's absolute filesystem path in the `Link` header,
/// percent-encoded but otherwise as-is. Paths on platforms where absolute
/// paths don't start with `/`, e.g., `C:\` on Windows, are rejected with
/// [`Rejection::InvalidTarget`].
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::http::{Header, Response};
/// use chef_serve::push::{Preload, Pusher};
///
/// // Create pusher and push resources
/// let mut pusher = Preload::new();
/// pusher.push("/assets/app.css")?;
/// pusher.push("/assets/app.js")?;
///
/// // Finish response
/// let mut res = Response::new();
/// pusher.finish(&mut res);
/// assert_eq!(
///     res.headers.get(Header::Link),
///     Some(concat!(
///         "</assets/app.css>; rel=preload; as=style, ",
///         "</assets/app.js>; rel=preload; as=script",
///     ))
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Preload {
    /// Targets in push order.
    targets: Vec<String>,
    /// Maximum number of targets.
    limit: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Preload {
    /// Default maximum number of pushes per response.
    pub const DEFAULT_LIMIT: usize = 32;

    /// Creates a preload pusher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates a preload pusher with the given limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { targets: Vec::new(), limit }
    }

    /// Returns the pushed targets.
    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Pusher for Preload {
    /// Pushes the resource at the given target.
    ///
    /// # Errors
    ///
    /// This method returns [`Rejection::InvalidTarget`] if the target isn't an
    /// absolute path or contains control characters, and [`Rejection::Limit`]
    /// if the limit of pushes was reached.
    fn push(&mut self, target: &str) -> result::Result<(), Rejection> {
        if !target.starts_with('/') || target.chars().any(char::is_control) {
            return Err(Rejection::InvalidTarget);
        }

        // Targets are only announced once
        if self.targets.iter().any(|current| current == target) {
            return Ok(());
        }
        if self.targets.len() >= self.limit {
            return Err(Rejection::Limit(self.limit));
        }

        // Remember target until response is finished
        self.targets.push(target.to_string());
        Ok(())
    }

    /// Finishes the given response, adding a preload link for each target.
    fn finish(&mut self, res: &mut Response) {
        for target in self.targets.drain(..) {
            let encoded = utf8_percent_encode(&target, PATH);
            let mut link = format!("<{encoded}>; rel=preload");
            if let Some(destination) = destination(&target) {
                link.push_str("; as=");
                link.push_str(destination);
            }
            res.headers.append(Header::Link, link);
        }
    }
}

// ----------------------------------------------------------------------------

impl Default for Preload {
    /// Creates a preload pusher with the default limit.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the preload destination for the given target, if known.
fn destination(target: &str) -> Option<&'static str> {
    let extension = Path::new(target).extension()?.to_str()?;
    match extension.to_ascii_lowercase().as_str() {
        "css" => Some("style"),
        "js" | "mjs" => Some("script"),
        "woff" | "woff2" | "ttf" | "otf" => Some("font"),
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico" => {
            Some("image")
        }
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_targets() {
        let mut pusher = Preload::new();
        for target in ["relative.css", "", "/a\nb.css", "C:\\app.js"] {
            let res = pusher.push(target);
            assert!(matches!(res, Err(Rejection::InvalidTarget)));
        }
        assert!(pusher.targets().is_empty());
    }

    #[test]
    fn test_rejects_beyond_limit() {
        let mut pusher = Preload::with_limit(2);
        assert!(pusher.push("/a.css").is_ok());
        assert!(pusher.push("/b.css").is_ok());
        assert!(pusher.push("/a.css").is_ok());
        assert!(matches!(pusher.push("/c.css"), Err(Rejection::Limit(2))));
        assert_eq!(pusher.targets(), ["/a.css", "/b.css"]);
    }

    #[test]
    fn test_finish_encodes_targets() {
        let mut pusher = Preload::new();
        pusher.push("/sample/my page.html").unwrap();
        pusher.push("/fonts/Inter.WOFF2").unwrap();

        let mut res = Response::new();
        pusher.finish(&mut res);
        assert_eq!(
            res.headers.get(Header::Link),
            Some(concat!(
                "</sample/my%20page.html>; rel=preload, ",
                "</fonts/Inter.WOFF2>; rel=preload; as=font",
            ))
        );
        assert!(pusher.targets().is_empty());
    }

    #[test]
    fn test_finish_without_targets() {
        let mut res = Response::new();
        Preload::new().finish(&mut res);
        assert!(!res.headers.contains(Header::Link));
    }
}
