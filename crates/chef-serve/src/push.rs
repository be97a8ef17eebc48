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

//! Server push.
//!
//! Pushing resources is only possible on connections that support it, which
//! is why every [`Writer`] carries a [`Capability`][]. This module provides
//! the capability probe and a helper that pushes a list of files, failing
//! fast when the probe fails or the transport rejects a push.
//!
//! [`Capability`]: crate::http::Capability

use std::path::{Component, Path, PathBuf};
use std::{env, io, result};
use tracing::debug;

use super::http::{Response, Writer};

mod error;
mod preload;

pub use error::{Error, Rejection, Result};
pub use preload::Preload;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Pusher.
///
/// Pushers are the transport seam of a pushable [`Writer`]. Each call to
/// [`Pusher::push`] performs a single push, and the pusher is finished with
/// the response once the writer is converted into it, which is the point at
/// which a pusher can announce the pushed resources to the client.
pub trait Pusher {
    /// Pushes the resource at the given target.
    ///
    /// # Errors
    ///
    /// This method returns [`Rejection`] if the resource can't be pushed.
    fn push(&mut self, target: &str) -> result::Result<(), Rejection>;

    /// Finishes the given response.
    fn finish(&mut self, _res: &mut Response) {}
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the writer supports pushing resources.
///
/// The outcome is logged, as this is usually checked once per request.
///
/// # Examples
///
/// ```
/// use chef_serve::http::{Capability, Request, Writer};
/// use chef_serve::push;
///
/// // Create request from a connection that doesn't support push
/// let req = Request::new().capability(Capability::Basic);
///
/// // Probe writer for push support
/// let writer = Writer::new(&req);
/// assert!(!push::is_supported(&writer));
/// ```
#[must_use]
pub fn is_supported(writer: &Writer) -> bool {
    report(writer.capability().is_pushable())
}

/// Pushes the given files.
///
/// The writer is probed exactly once. If it doesn't support pushing, this
/// function returns immediately without touching any file. Otherwise, files
/// are normalized and pushed in order, stopping at the first failure. Pushes
/// that were already made are not rolled back, as they're only a hint.
/// Relative files are resolved against the working directory, and the
/// resulting server path is what the pusher announces.
///
/// # Errors
///
/// This function returns [`Error::Unsupported`] if the writer can't push,
/// [`Error::PathResolution`] if a file can't be normalized, and
/// [`Error::PushFailed`] if the transport rejects a push.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::http::{Capability, Header, Request, Response, Writer};
/// use chef_serve::push;
///
/// // Create request from a connection that supports push
/// let req = Request::new().capability(Capability::Pushable);
///
/// // Push files and finish response
/// let mut writer = Writer::new(&req);
/// push::push_files(&mut writer, ["/assets/app.js"])?;
///
/// let res = Response::from(writer);
/// assert!(res.headers.contains(Header::Link));
/// # Ok(())
/// # }
/// ```
pub fn push_files<I>(writer: &mut Writer, files: I) -> Result
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    let Some(pusher) = writer.pusher() else {
        report(false);
        return Err(Error::Unsupported);
    };
    report(true);

    // Push files in order, stopping at the first failure
    for file in files {
        let file = file.as_ref();
        let path = normalize(file).and_then(|path| {
            path.into_os_string().into_string().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "path is not UTF-8")
            })
        });

        // Resolution errors carry the reference as given by the caller
        let target = path.map_err(|source| Error::PathResolution {
            path: file.display().to_string(),
            source,
        })?;

        debug!(path = %target, "pushing file");
        pusher.push(&target).map_err(|source| Error::PushFailed {
            path: file.display().to_string(),
            source,
        })?;
    }

    // All files pushed
    Ok(())
}

/// Normalizes the given path.
///
/// Relative paths are joined onto the current working directory, and then
/// cleaned lexically: `.` components are dropped, and `..` components remove
/// the previous component, but never go above the root. The file system is
/// not consulted, so the path doesn't need to exist. Normalizing a path that
/// was already normalized returns it unchanged.
///
/// # Errors
///
/// This function returns [`io::Error`] if the current working directory
/// can't be determined.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::push;
/// use std::path::Path;
///
/// // Normalize path
/// let path = push::normalize("/srv/www/./assets/../index.html")?;
/// # #[cfg(unix)]
/// assert_eq!(path, Path::new("/srv/www/index.html"));
/// # Ok(())
/// # }
/// ```
pub fn normalize<P>(path: P) -> io::Result<PathBuf>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    // Clean path lexically - popping the root is a no-op
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            _ => normalized.push(component),
        }
    }

    // Return normalized path
    Ok(normalized)
}

// ----------------------------------------------------------------------------

/// Logs and returns the outcome of a capability probe.
fn report(supported: bool) -> bool {
    if supported {
        debug!("push supported");
    } else {
        debug!("push not supported");
    }
    supported
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    #[cfg(unix)]
    use std::ffi::OsStr;
    #[cfg(unix)]
    use std::os::unix::ffi::OsStrExt;
    use std::rc::Rc;

    use crate::http::{Capability, Header, Request};

    use super::*;

    /// Pusher recording every attempt, and failing for one target.
    struct Recorder {
        attempts: Rc<RefCell<Vec<String>>>,
        failing: Option<&'static str>,
    }

    impl Pusher for Recorder {
        fn push(&mut self, target: &str) -> result::Result<(), Rejection> {
            self.attempts.borrow_mut().push(target.to_string());
            match self.failing {
                Some(name) if target.ends_with(name) => {
                    Err(Rejection::InvalidTarget)
                }
                _ => Ok(()),
            }
        }
    }

    fn recorder(
        failing: Option<&'static str>,
    ) -> (Writer, Rc<RefCell<Vec<String>>>) {
        let attempts = Rc::new(RefCell::new(Vec::new()));
        let writer = Writer::pushable(Recorder {
            attempts: Rc::clone(&attempts),
            failing,
        });
        (writer, attempts)
    }

    #[test]
    fn test_is_supported() {
        let req = Request::new().capability(Capability::Pushable);
        assert!(is_supported(&Writer::new(&req)));
        assert!(!is_supported(&Writer::basic()));
    }

    #[test]
    fn test_unsupported_without_files() {
        let mut writer = Writer::basic();
        let files: [&str; 0] = [];
        let res = push_files(&mut writer, files);
        assert!(matches!(res, Err(Error::Unsupported)));
    }

    #[test]
    fn test_unsupported_with_files() {
        let mut writer = Writer::basic();
        let res = push_files(&mut writer, ["a.css", "b.js"]);
        assert!(matches!(res, Err(Error::Unsupported)));
        assert_eq!(res.unwrap_err().to_string(), "push capability unavailable");
    }

    #[test]
    fn test_pushable_without_files() {
        let (mut writer, attempts) = recorder(None);
        let files: Vec<PathBuf> = Vec::new();
        assert!(push_files(&mut writer, files).is_ok());
        assert!(attempts.borrow().is_empty());
    }

    #[test]
    fn test_pushable_with_files() {
        let (mut writer, attempts) = recorder(None);
        assert!(push_files(&mut writer, ["a.css", "b.js", "c.png"]).is_ok());
        assert_eq!(attempts.borrow().len(), 3);
        let names = ["a.css", "b.js", "c.png"];
        for (attempt, name) in attempts.borrow().iter().zip(names) {
            assert!(Path::new(attempt).is_absolute());
            assert!(attempt.ends_with(name));
        }
    }

    #[test]
    fn test_stops_at_first_failure() {
        let (mut writer, attempts) = recorder(Some("b.js"));
        let res = push_files(&mut writer, ["a.css", "b.js", "c.png"]);
        match res {
            Err(Error::PushFailed { path, source }) => {
                assert_eq!(path, "b.js");
                assert!(matches!(source, Rejection::InvalidTarget));
            }
            _ => panic!("expected push failure"),
        }
        let attempts = attempts.borrow();
        assert_eq!(attempts.len(), 2);
        assert!(attempts[0].ends_with("a.css"));
        assert!(attempts[1].ends_with("b.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stops_at_unresolvable_path() {
        let (mut writer, attempts) = recorder(None);
        let files = [
            OsStr::new("/ok.css"),
            OsStr::from_bytes(b"/a\xff.css"),
            OsStr::new("/c.css"),
        ];
        let res = push_files(&mut writer, files);
        match res {
            Err(Error::PathResolution { path, source }) => {
                assert!(path.starts_with("/a"));
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            _ => panic!("expected resolution failure"),
        }
        assert_eq!(*attempts.borrow(), ["/ok.css"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_announces_server_paths() {
        let req = Request::new().capability(Capability::Pushable);
        let mut writer = Writer::new(&req);
        push_files(&mut writer, ["/srv/site/./app.css"]).unwrap();

        let res = Response::from(writer);
        assert_eq!(
            res.headers.get(Header::Link),
            Some("</srv/site/app.css>; rel=preload; as=style")
        );
    }

    #[test]
    fn test_normalize_relative() {
        let path = normalize("sample/./test.html").unwrap();
        let base = env::current_dir().unwrap();
        assert_eq!(path, base.join("sample").join("test.html"));
    }

    #[test]
    fn test_normalize_idempotent() {
        for path in ["a/../b/./c", "../..", ".", "x/y/../../z"] {
            let once = normalize(path).unwrap();
            assert_eq!(normalize(&once).unwrap(), once);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_never_above_root() {
        assert_eq!(normalize("/../../a/./b/..").unwrap(), Path::new("/a"));
        assert_eq!(normalize("/..").unwrap(), Path::new("/"));
    }
}
