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

//! Configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Configuration.
///
/// Configuration is read from a JSON document with PascalCase keys. Every
/// key is optional: the server listens on `localhost:8080` by default, and
/// only uses TLS when both a certificate and a private key are given.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef::Config;
///
/// // Create configuration from JSON
/// let config: Config = serde_json::from_str(r#"{ "Port": 8443 }"#)?;
/// assert_eq!(config.addr(), "localhost:8443");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    /// Host name or address to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Certificate of the authority that signed the server certificate.
    #[serde(rename = "RootCA", skip_serializing_if = "Option::is_none")]
    pub root_ca: Option<PathBuf>,
    /// Server certificate chain in PEM format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,
    /// Server private key in PEM format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Loads the configuration from the JSON document at the given path.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::NotFound`] if the file does not exist,
    /// [`Error::NotJson`] if it's not a JSON document, and [`Error::Invalid`]
    /// if the document does not describe a configuration. Both of the latter
    /// are kept apart, so callers can tell a wrong file from a wrong setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef::config::{Config, Error};
    ///
    /// // Load configuration from missing file
    /// let res = Config::load("incorrect.wrong");
    /// assert!(matches!(res, Err(Error::NotFound(_))));
    /// ```
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(err),
        })?;

        // Syntax errors mean that we're not looking at JSON at all, while
        // data errors mean that the document has the wrong shape
        let config: Config =
            serde_json::from_slice(&data).map_err(|err| {
                if err.is_syntax() || err.is_eof() {
                    Error::NotJson(err)
                } else {
                    Error::Invalid(err)
                }
            })?;

        // Configuration loaded
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Returns the address to listen on, in `host:port` notation.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Config {
    /// Creates a configuration listening on `localhost:8080` without TLS.
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 8080,
            root_ca: None,
            cert_file: None,
            key_file: None,
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Config {
    /// Formats the configuration for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef::Config;
    ///
    /// // Format default configuration
    /// let config = Config::default();
    /// assert_eq!(config.to_string(), "Host: localhost\nPort: 8080\n");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Host: {}", self.host)?;
        writeln!(f, "Port: {}", self.port)?;
        let paths = [
            ("RootCA", &self.root_ca),
            ("CertFile", &self.cert_file),
            ("KeyFile", &self.key_file),
        ];

        // Only print paths that are set
        let iter = paths
            .into_iter()
            .filter_map(|(name, path)| path.as_ref().map(|path| (name, path)));
        for (name, path) in iter {
            writeln!(f, "{name}: {}", path.display())?;
        }

        // No errors occurred
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn sample(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("sample").join(name)
    }

    #[test]
    fn test_load_missing_file() {
        match Config::load("incorrect.wrong") {
            Err(Error::NotFound(path)) => {
                assert_eq!(path, Path::new("incorrect.wrong"));
            }
            res => panic!("unexpected result: {res:?}"),
        }
    }

    #[test]
    fn test_load_html_file() {
        let res = Config::load(sample("test.html"));
        assert!(matches!(res, Err(Error::NotJson(_))));
    }

    #[test]
    fn test_load_sample() {
        let config = Config::load(sample("config.json")).expect("config");
        assert_eq!(config.addr(), "localhost:8080");
        assert_eq!(config.root_ca, None);
        assert_eq!(config.cert_file, None);
        assert_eq!(config.key_file, None);
    }

    #[test]
    fn test_load_sample_tls() {
        let config = Config::load(sample("config_tls.json")).expect("config");
        assert_eq!(config.port, 8443);
        assert_eq!(config.root_ca, Some(PathBuf::from("sample/ca.pem")));
        assert_eq!(config.cert_file, Some(PathBuf::from("sample/cert.pem")));
        assert_eq!(config.key_file, Some(PathBuf::from("sample/key.pem")));
    }

    #[test]
    fn test_load_invalid_shape() {
        let path = env::temp_dir().join("chef-config-invalid.json");
        fs::write(&path, r#"{ "Port": "eighty" }"#).expect("write");
        let res = Config::load(&path);
        assert!(matches!(res, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_display_paths() {
        let config = Config {
            cert_file: Some(PathBuf::from("cert.pem")),
            key_file: Some(PathBuf::from("key.pem")),
            ..Config::default()
        };
        assert_eq!(
            config.to_string(),
            concat!(
                "Host: localhost\n",
                "Port: 8080\n",
                "CertFile: cert.pem\n",
                "KeyFile: key.pem\n",
            )
        );
    }
}
