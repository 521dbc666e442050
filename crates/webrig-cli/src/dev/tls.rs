//! HTTPS for the dev server with a throwaway self-signed certificate.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::serve::Listener;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::server::TlsStream;
use tracing::debug;

use crate::error::{CliError, Result};

/// Build a TLS acceptor for a certificate generated on the spot for `hosts`.
///
/// Browsers will warn about it; it is regenerated on every start.
pub fn self_signed_acceptor(hosts: &[String]) -> Result<TlsAcceptor> {
    let rcgen::CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(hosts.to_vec())
        .map_err(|e| CliError::Server(format!("failed to generate certificate: {e}")))?;
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .and_then(|builder| {
            builder
                .with_no_client_auth()
                .with_single_cert(vec![cert.der().clone()], key)
        })
        .map_err(|e| CliError::Server(format!("invalid TLS configuration: {e}")))?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Names the certificate is issued for.
pub fn certificate_hosts(host: std::net::IpAddr) -> Vec<String> {
    let mut hosts = vec!["localhost".to_string(), "127.0.0.1".to_string()];
    if !host.is_unspecified() && !host.is_loopback() {
        hosts.push(host.to_string());
    }
    hosts
}

/// TCP listener that completes the TLS handshake before handing the
/// connection to axum. Failed handshakes are dropped.
pub struct TlsListener {
    inner: TcpListener,
    acceptor: TlsAcceptor,
}

impl TlsListener {
    pub fn new(inner: TcpListener, acceptor: TlsAcceptor) -> Self {
        Self { inner, acceptor }
    }
}

impl Listener for TlsListener {
    type Io = TlsStream<TcpStream>;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        loop {
            let (stream, addr) = Listener::accept(&mut self.inner).await;
            match self.acceptor.accept(stream).await {
                Ok(tls) => return (tls, addr),
                Err(e) => debug!("TLS handshake with {addr} failed: {e}"),
            }
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        self.inner.local_addr()
    }
}
