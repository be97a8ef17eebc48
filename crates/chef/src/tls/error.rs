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

//! TLS error.

use rustls_pki_types::pem;
use std::path::PathBuf;
use std::{io, result};
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// TLS error.
#[derive(Debug, Error)]
pub enum Error {
    /// File does not exist, or was not configured.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File could not be decoded as PEM.
    #[error("invalid PEM file: {}", .path.display())]
    Pem {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: pem::Error,
    },

    /// File does not contain any certificate.
    #[error("no certificate found in: {}", .0.display())]
    NoCertificate(PathBuf),

    /// File does not contain a private key.
    #[error("no private key found in: {}", .0.display())]
    NoPrivateKey(PathBuf),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Rustls error.
    #[error(transparent)]
    Rustls(#[from] rustls::Error),
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// TLS result.
pub type Result<T = ()> = result::Result<T, Error>;
