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

//! Service integration tests.

use chef::service::Error;
use chef::{Config, Service, config, tls};
use chef_serve::http::response::ResponseExt;
use chef_serve::http::{Request, Response, Status, Writer};
use chef_serve::push;
use chef_serve::router::{Params, Router};
use rcgen::CertifiedKey;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use std::{fs, thread};
use tracing::warn;

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

/// Creates the router under test.
fn router() -> Router {
    Router::new()
        .get("/valid", |_req: Request, _params: Params| {
            Response::from_status(Status::Ok)
        })
        .get("/invalid", |_req: Request, _params: Params| {
            Response::from_status(Status::NotFound)
        })
        .get("/push", |req: Request, _params: Params| {
            let mut writer = Writer::new(&req);
            writer.response = Response::from_text("Hello, push!");
            let res = push::push_files(&mut writer, ["sample/test.html"]);
            if let Err(err) = res {
                warn!(%err, "unable to push");
            }
            writer
        })
}

/// Creates a router whose only route panics.
fn panicking_router() -> Router {
    Router::new().get("/boom", |_req: Request, _params: Params| -> Response {
        panic!("handler failed")
    })
}

/// Creates a configuration listening on a free local port.
fn plain_config() -> Config {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Config {
        host: String::from("127.0.0.1"),
        port: 0,
        ..Config::default()
    }
}

/// Creates a TLS configuration with a freshly generated key pair.
fn tls_config(name: &str) -> Config {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::create_dir_all(&dir).unwrap();
    let CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".into()]).unwrap();

    // The certificate is self-signed, so it's its own authority
    let cert_file = dir.join("cert.pem");
    let key_file = dir.join("key.pem");
    fs::write(&cert_file, cert.pem()).unwrap();
    fs::write(&key_file, key_pair.serialize_pem()).unwrap();
    Config {
        root_ca: Some(cert_file.clone()),
        cert_file: Some(cert_file),
        key_file: Some(key_file),
        ..plain_config()
    }
}

/// Formats a request that asks the server to close the connection.
fn request(path: &str) -> String {
    format!(
        "GET {path} HTTP/1.1\r\nHost: localhost\r\n\
         Connection: close\r\n\r\n"
    )
}

/// Sends a request over plain HTTP and reads the response.
fn fetch(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(request(path).as_bytes()).unwrap();
    let mut res = String::new();
    stream.read_to_string(&mut res).unwrap();
    res
}

/// Sends a request over TLS and reads the response.
fn fetch_tls(addr: SocketAddr, tls: &Arc<ClientConfig>, path: &str) -> String {
    let name = ServerName::try_from("localhost").unwrap();
    let conn = ClientConnection::new(Arc::clone(tls), name).unwrap();
    let sock = TcpStream::connect(addr).unwrap();
    let mut stream = StreamOwned::new(conn, sock);
    stream.write_all(request(path).as_bytes()).unwrap();

    // Peers that skip close_notify end the stream with an EOF error
    let mut res = Vec::new();
    match stream.read_to_end(&mut res) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => {}
        Err(err) => panic!("unexpected error: {err}"),
    }
    String::from_utf8(res).unwrap()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn test_tls_requests() {
    let config = tls_config("tls-requests");
    let client = tls::client_config(&config).unwrap();
    let service = Arc::new(Service::new(config, router).unwrap());
    let (addr, handle) = service.spawn().unwrap();
    assert!(service.is_running());

    // Requests with and without matching routes
    let res = fetch_tls(addr, &client, "/valid");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"));
    let res = fetch_tls(addr, &client, "/invalid");
    assert!(res.starts_with("HTTP/1.1 404 Not Found\r\n"));

    // TLS connections can push, which is announced as preload
    let res = fetch_tls(addr, &client, "/push");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(res.contains("test.html>; rel=preload"));
    assert!(res.ends_with("Hello, push!"));

    // Stop service
    service.quit().unwrap();
    assert!(!service.is_running());
    handle.join().unwrap().unwrap();
}

#[test]
fn test_plain_requests_cannot_push() {
    let service = Arc::new(Service::new(plain_config(), router).unwrap());
    let (addr, handle) = service.spawn().unwrap();

    // Plain connections serve requests, but can't push
    let res = fetch(addr, "/push");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(!res.contains("Link: "));
    assert!(res.ends_with("Hello, push!"));

    // Stop service
    service.quit().unwrap();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_quit_is_idempotent() {
    let service = Arc::new(Service::new(plain_config(), router).unwrap());
    service.quit().unwrap();
    let (_, handle) = service.spawn().unwrap();

    // Quitting twice is fine, restarting is not
    service.quit().unwrap();
    assert!(!service.is_running());
    service.quit().unwrap();
    handle.join().unwrap().unwrap();
    let (notifier, _listener) = chef::service::ready::channel();
    assert!(matches!(service.run(notifier), Err(Error::AlreadyStarted)));
}

#[test]
fn test_bind_failure_releases_listener() {
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = Config {
        port: taken.local_addr().unwrap().port(),
        ..plain_config()
    };

    // Spawning must fail instead of waiting forever
    let service = Arc::new(Service::new(config, router).unwrap());
    let res = service.spawn();
    assert!(matches!(res, Err(Error::Server(_))));
    assert!(!service.is_running());
}

#[test]
fn test_invalid_configuration() {
    let res = Service::load("incorrect.wrong", router);
    assert!(matches!(res, Err(Error::Config(config::Error::NotFound(_)))));
    let res = Service::load("sample/test.html", router);
    assert!(matches!(res, Err(Error::Config(config::Error::NotJson(_)))));

    // Half a key pair must never result in a plain service
    let config = Config {
        key_file: None,
        ..tls_config("half-key-pair")
    };
    let res = Service::new(config, router);
    assert!(matches!(res, Err(Error::Tls(tls::Error::NotFound(_)))));
}

#[test]
fn test_connections_drain_on_quit() {
    let service = Arc::new(Service::new(plain_config(), router).unwrap());
    let (addr, handle) = service.spawn().unwrap();

    // Open a connection with a partial request, give the server a moment to
    // read it, then quit from elsewhere
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(b"GET /valid HTTP/1.1\r\n").unwrap();
    thread::sleep(Duration::from_millis(200));
    let quitter = thread::spawn({
        let service = Arc::clone(&service);
        move || service.quit()
    });

    // Finishing the request still yields a response
    stream.write_all(b"Host: localhost\r\n\r\n").unwrap();
    let mut res = String::new();
    stream.read_to_string(&mut res).unwrap();
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"));

    // Quit returns once the loop is done
    quitter.join().unwrap().unwrap();
    assert!(!service.is_running());
    handle.join().unwrap().unwrap();
}

#[test]
fn test_panicking_handler_stops_service() {
    let config = plain_config();
    let service = Arc::new(Service::new(config, panicking_router).unwrap());
    let (addr, handle) = service.spawn().unwrap();

    // The connection goes away with the serving thread
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(request("/boom").as_bytes()).unwrap();
    let _ = stream.read_to_string(&mut String::new());
    assert!(handle.join().is_err());

    // Quitting afterwards leaves the service stopped
    assert!(!service.is_running());
    service.quit().unwrap();
    assert!(!service.is_running());
}
