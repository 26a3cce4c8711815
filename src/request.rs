use std::net::SocketAddr;

use bytes::Bytes;
use hyper::Request;
use hyper::Version;
use rackenv_keys::DEFAULT_HOST;
use rackenv_keys::DEFAULT_PORT;
use rackenv_keys::HTTP_10;
use rackenv_keys::HTTP_11;

/// A header field exactly as it arrived on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawHeader {
  name: Bytes,
  value: Bytes,
}

impl RawHeader {
  pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
    Self { name: name.into(), value: value.into() }
  }

  pub fn name(&self) -> &[u8] {
    &self.name
  }

  pub fn value(&self) -> &[u8] {
    &self.value
  }
}

/// A parsed request head plus its unread body, as handed over by the connection layer.
///
/// Header fields are kept in arrival order and are not validated yet.
#[derive(Debug)]
pub struct RawRequest<B> {
  method: String,
  target: String,
  version: Version,
  headers: Vec<RawHeader>,
  body: B,
}

impl<B> RawRequest<B> {
  pub fn new(method: impl Into<String>, target: impl Into<String>, body: B) -> Self {
    Self {
      method: method.into(),
      target: target.into(),
      version: Version::HTTP_11,
      headers: Vec::new(),
      body,
    }
  }

  pub fn with_version(mut self, version: Version) -> Self {
    self.version = version;
    self
  }

  pub fn with_header(mut self, name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
    self.headers.push(RawHeader::new(name, value));
    self
  }

  pub fn push_header(&mut self, header: RawHeader) {
    self.headers.push(header);
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn version(&self) -> Version {
    self.version
  }

  pub fn headers(&self) -> &[RawHeader] {
    &self.headers
  }

  pub fn body(&self) -> &B {
    &self.body
  }

  pub(crate) fn into_body(self) -> B {
    self.body
  }
}

impl<B> From<Request<B>> for RawRequest<B> {
  fn from(request: Request<B>) -> Self {
    let (parts, body) = request.into_parts();
    let target = match (parts.uri.scheme(), parts.uri.path_and_query()) {
      (None, Some(path_and_query)) => path_and_query.as_str().to_string(),
      _ => parts.uri.to_string(),
    };
    let headers = parts
      .headers
      .iter()
      .map(|(name, value)| {
        let name = Bytes::copy_from_slice(name.as_str().as_bytes());
        RawHeader::new(name, Bytes::copy_from_slice(value.as_bytes()))
      })
      .collect();

    Self { method: parts.method.to_string(), target, version: parts.version, headers, body }
  }
}

/// Who is answering the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerIdentity {
  software: String,
  name: String,
  port: u16,
}

impl ServerIdentity {
  pub fn new(software: impl Into<String>, name: impl Into<String>, port: u16) -> Self {
    Self { software: software.into(), name: name.into(), port }
  }

  pub fn from_local_addr(software: impl Into<String>, local_addr: SocketAddr) -> Self {
    Self::new(software, local_addr.ip().to_string(), local_addr.port())
  }

  pub fn software(&self) -> &str {
    &self.software
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn port(&self) -> u16 {
    self.port
  }
}

impl Default for ServerIdentity {
  fn default() -> Self {
    let software = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    Self::new(software, DEFAULT_HOST, DEFAULT_PORT)
  }
}

/// What the connection layer negotiated with the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
  protocol: String,
  peer_addr: Option<SocketAddr>,
}

impl ConnectionInfo {
  pub fn new(protocol: impl Into<String>) -> Self {
    Self { protocol: protocol.into(), peer_addr: None }
  }

  pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
    self.peer_addr = Some(peer_addr);
    self
  }

  /// The wire version string, e.g. `HTTP/1.1`.
  pub fn protocol(&self) -> &str {
    &self.protocol
  }

  pub fn peer_addr(&self) -> Option<SocketAddr> {
    self.peer_addr
  }
}

impl From<Version> for ConnectionInfo {
  fn from(version: Version) -> Self {
    match version {
      Version::HTTP_10 => Self::new(HTTP_10),
      Version::HTTP_11 => Self::new(HTTP_11),
      version => Self::new(format!("{version:?}")),
    }
  }
}

impl Default for ConnectionInfo {
  fn default() -> Self {
    Self::new(HTTP_11)
  }
}
