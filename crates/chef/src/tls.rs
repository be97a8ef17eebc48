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

//! TLS settings.
//!
//! Both halves of the key pair are read from PEM files named by [`Config`].
//! Leaving out both means the server speaks plain HTTP, while leaving out
//! only one of them is an error, since it's almost certainly a mistake.

use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use rustls_pki_types::pem::{self, PemObject};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, result};
use tracing::debug;

use super::config::Config;

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates the server-side TLS settings for the given configuration.
///
/// Returns [`None`] if the configuration doesn't name a key pair, in which
/// case the server should not use TLS at all.
///
/// # Errors
///
/// This function returns [`Error::NotFound`] if only one half of the key
/// pair is configured or a file does not exist, and [`Error::NoCertificate`]
/// or [`Error::NoPrivateKey`] if a file does not contain what it should.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef::{tls, Config};
///
/// // Create TLS settings for configuration without key pair
/// let tls = tls::server_config(&Config::default())?;
/// assert!(tls.is_none());
/// # Ok(())
/// # }
/// ```
pub fn server_config(config: &Config) -> Result<Option<Arc<ServerConfig>>> {
    let cert_file = setting(config.cert_file.as_ref());
    let key_file = setting(config.key_file.as_ref());
    let (cert_file, key_file) = match (cert_file, key_file) {
        (Some(cert_file), Some(key_file)) => (cert_file, key_file),
        (None, None) => return Ok(None),
        _ => return Err(Error::NotFound(PathBuf::new())),
    };

    // Read certificate chain and private key, then assemble settings
    let certs = certificates(cert_file)?;
    let key = private_key(key_file)?;
    let tls = ServerConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    // Key pair loaded
    debug!(
        cert = %cert_file.display(),
        key = %key_file.display(),
        "loaded key pair"
    );
    Ok(Some(Arc::new(tls)))
}

/// Creates client-side TLS settings trusting the configured root authority.
///
/// # Errors
///
/// This function returns [`Error::NotFound`] if no root authority is
/// configured or the file does not exist.
pub fn client_config(config: &Config) -> Result<Arc<ClientConfig>> {
    let root_ca = setting(config.root_ca.as_ref())
        .ok_or_else(|| Error::NotFound(PathBuf::new()))?;

    // Trust all certificates contained in the file
    let mut roots = RootCertStore::empty();
    for cert in certificates(root_ca)? {
        roots.add(cert)?;
    }

    // Assemble settings
    let tls = ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(tls))
}

// ----------------------------------------------------------------------------

/// Returns the crypto provider.
fn provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Returns the path of a setting, treating empty paths as absent.
fn setting(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path)
        .filter(|path| !path.as_os_str().is_empty())
}

/// Reads the file at the given path.
fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })
}

/// Reads all certificates from the PEM file at the given path.
fn certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let data = read(path)?;
    let certs = CertificateDer::pem_slice_iter(&data)
        .collect::<result::Result<Vec<_>, _>>()
        .map_err(|source| Error::Pem { path: path.to_path_buf(), source })?;

    // Ensure there's at least one certificate
    if certs.is_empty() {
        Err(Error::NoCertificate(path.to_path_buf()))
    } else {
        Ok(certs)
    }
}

/// Reads the first private key from the PEM file at the given path.
fn private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let data = read(path)?;
    PrivateKeyDer::from_pem_slice(&data).map_err(|err| match err {
        pem::Error::NoItemsFound => Error::NoPrivateKey(path.to_path_buf()),
        source => Error::Pem { path: path.to_path_buf(), source },
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rcgen::CertifiedKey;
    use std::env;

    use super::*;

    /// Writes a self-signed key pair into a fresh directory.
    fn fixture(name: &str) -> (PathBuf, PathBuf) {
        let dir = env::temp_dir().join(format!("chef-tls-{name}"));
        fs::create_dir_all(&dir).expect("directory");
        let CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".into()])
                .expect("certificate");

        // Write certificate and key
        let cert_file = dir.join("cert.pem");
        let key_file = dir.join("key.pem");
        fs::write(&cert_file, cert.pem()).expect("write");
        fs::write(&key_file, key_pair.serialize_pem()).expect("write");
        (cert_file, key_file)
    }

    #[test]
    fn test_without_key_pair() {
        let tls = server_config(&Config::default()).expect("settings");
        assert!(tls.is_none());
    }

    #[test]
    fn test_empty_paths() {
        let config = Config {
            cert_file: Some(PathBuf::new()),
            key_file: Some(PathBuf::new()),
            ..Config::default()
        };
        let tls = server_config(&config).expect("settings");
        assert!(tls.is_none());
    }

    #[test]
    fn test_half_key_pair() {
        let (cert_file, _) = fixture("half");
        let config = Config {
            cert_file: Some(cert_file),
            ..Config::default()
        };
        let res = server_config(&config);
        assert!(matches!(res, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_missing_file() {
        let (cert_file, _) = fixture("missing");
        let key_file = PathBuf::from("incorrect.wrong");
        let config = Config {
            cert_file: Some(cert_file),
            key_file: Some(key_file.clone()),
            ..Config::default()
        };
        match server_config(&config) {
            Err(Error::NotFound(path)) => assert_eq!(path, key_file),
            res => panic!("unexpected result: {res:?}"),
        }
    }

    #[test]
    fn test_key_pair() {
        let (cert_file, key_file) = fixture("pair");
        let config = Config {
            cert_file: Some(cert_file),
            key_file: Some(key_file),
            ..Config::default()
        };
        let tls = server_config(&config).expect("settings");
        assert!(tls.is_some());
    }

    #[test]
    fn test_swapped_key_pair() {
        let (cert_file, key_file) = fixture("swapped");
        let config = Config {
            cert_file: Some(key_file),
            key_file: Some(cert_file),
            ..Config::default()
        };
        let res = server_config(&config);
        assert!(matches!(res, Err(Error::NoCertificate(_))));
    }

    #[test]
    fn test_client_config() {
        let (cert_file, _) = fixture("client");
        let config = Config {
            root_ca: Some(cert_file),
            ..Config::default()
        };
        assert!(client_config(&config).is_ok());
        let res = client_config(&Config::default());
        assert!(matches!(res, Err(Error::NotFound(_))));
    }
}
