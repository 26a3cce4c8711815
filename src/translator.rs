use std::str::FromStr;

use hyper::Method;
use hyper::Uri;
use hyper::header::HeaderName;
use hyper::header::HeaderValue;
use hyper::http::uri::PathAndQuery;
use rackenv_keys::CGI_VER;
use rackenv_keys::Key;
use rackenv_keys::Registry;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

use crate::environment::Environment;
use crate::error::HeaderError;
use crate::error::RequestLineError;
use crate::error::TranslateError;
use crate::input::Input;
use crate::request::ConnectionInfo;
use crate::request::RawHeader;
use crate::request::RawRequest;
use crate::request::ServerIdentity;

/// Builds CGI/Rack environments out of raw requests.
///
/// A translator holds nothing but its registry, so one value can be shared by every request
/// handling task.
#[derive(Clone, Copy, Debug, Default)]
pub struct Translator {
  registry: Registry,
}

impl Translator {
  pub fn new(registry: Registry) -> Self {
    Self { registry }
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// The key the request body is bound under.
  pub fn input_key(&self) -> &'static str {
    self.registry.key(Key::Input)
  }

  /// Translates `request` into its environment.
  ///
  /// Fails only when the method or target is unusable. Malformed header fields are dropped with
  /// a warning. The body is bound without being polled.
  #[instrument(
    level = "debug",
    skip_all,
    fields(method = request.method(), target = request.target()),
    err(level = "debug")
  )]
  pub fn translate<B>(
    &self,
    request: RawRequest<B>,
    server: &ServerIdentity,
    connection: &ConnectionInfo,
  ) -> Result<Environment<B>, TranslateError> {
    let method = parse_method(request.method())?;
    let target = Target::parse(request.target())?;

    let mut environment = Environment::new(self.input_key());
    let mut declares_body = false;
    for header in request.headers() {
      match self.fold_header(header) {
        Ok((key, value)) => {
          declares_body |= self.declares_body(&key, &value);
          environment.append(key, &value);
        }
        Err(err) => warn!("Skipping header: {err}"),
      }
    }

    let registry = &self.registry;
    environment.insert(registry.key(Key::RequestMethod), method);
    environment.insert(registry.key(Key::RequestUri), request.target());
    environment.insert(registry.key(Key::RequestPath), target.path.as_str());
    environment.insert(registry.key(Key::PathInfo), target.path);
    environment.insert(registry.key(Key::QueryString), target.query);
    environment.insert(registry.key(Key::ServerSoftware), server.software());
    environment.insert(registry.key(Key::ServerProtocol), CGI_VER);
    environment.insert(registry.key(Key::GatewayInterface), CGI_VER);
    environment.insert(registry.key(Key::ServerName), server.name());
    environment.insert(registry.key(Key::ServerPort), server.port().to_string());
    environment.insert(registry.key(Key::RequestProtocol), connection.protocol());
    if let Some(peer_addr) = connection.peer_addr() {
      environment.insert(registry.key(Key::RemoteAddr), peer_addr.ip().to_string());
      environment.insert(registry.key(Key::RemotePort), peer_addr.port().to_string());
    }

    let input = match declares_body {
      true => Input::new(request.into_body()),
      false => Input::empty(),
    };
    environment.bind_input(input);

    debug!(vars = environment.vars().len(), body = declares_body, "Translated request");
    Ok(environment)
  }

  /// Maps a header field to its environment key and value.
  ///
  /// Fields with a dedicated [`Key`] use the registry's key string; every other field becomes
  /// `HTTP_` followed by its upper-cased name with `-` replaced by `_`.
  pub fn fold_header(&self, header: &RawHeader) -> Result<(String, String), TranslateError> {
    let malformed = |reason| TranslateError::MalformedHeader {
      name: String::from_utf8_lossy(header.name()).into_owned(),
      reason,
    };

    if header.name().is_empty() {
      return Err(malformed(HeaderError::EmptyName));
    }
    let name =
      HeaderName::from_bytes(header.name()).map_err(|_| malformed(HeaderError::InvalidName))?;
    let value = HeaderValue::from_bytes(header.value().trim_ascii())
      .map_err(|_| malformed(HeaderError::InvalidValue))?;

    let key = match Key::for_header(name.as_str()) {
      Some(key) => self.registry.key(key).to_string(),
      None => format!("HTTP_{}", name.as_str().to_uppercase().replace('-', "_")),
    };
    // obs-text bytes are kept as ISO-8859-1.
    let value = value.as_bytes().iter().map(|&byte| char::from(byte)).collect();
    Ok((key, value))
  }

  /// Whether a folded header announces a body, either by length or by chunked framing.
  fn declares_body(&self, key: &str, value: &str) -> bool {
    if key == self.registry.key(Key::ContentLength) {
      return true;
    }
    key == "HTTP_TRANSFER_ENCODING"
      && value.split(',').any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
  }
}

fn parse_method(method: &str) -> Result<&str, RequestLineError> {
  if method.is_empty() {
    return Err(RequestLineError::EmptyMethod);
  }
  Method::from_bytes(method.as_bytes())
    .map_err(|_| RequestLineError::InvalidMethod(method.to_string()))?;
  Ok(method)
}

/// A request target split at its first `?`. Nothing is percent-decoded.
#[derive(Debug, PartialEq, Eq)]
pub struct Target {
  pub path: String,
  pub query: String,
}

impl Target {
  /// Accepts the origin form (`/path?query`) and the absolute form (`http://host/path?query`).
  ///
  /// A fragment is never part of a request target and is rejected rather than dropped.
  pub fn parse(target: &str) -> Result<Self, RequestLineError> {
    if target.is_empty() {
      return Err(RequestLineError::EmptyTarget);
    }
    if target.contains('#') {
      return Err(RequestLineError::InvalidTarget(target.to_string()));
    }

    let invalid = |_| RequestLineError::InvalidTarget(target.to_string());
    let target = match target.starts_with('/') {
      true => {
        let path_and_query = PathAndQuery::from_str(target).map_err(invalid)?;
        Self::new(path_and_query.path(), path_and_query.query())
      }
      false => {
        let uri = Uri::from_str(target).map_err(invalid)?;
        if uri.scheme().is_none() || uri.authority().is_none() {
          return Err(RequestLineError::UnsupportedTarget(target.to_string()));
        }
        Self::new(uri.path(), uri.query())
      }
    };
    Ok(target)
  }

  fn new(path: &str, query: Option<&str>) -> Self {
    let path = if path.is_empty() { "/" } else { path };
    Self { path: path.to_string(), query: query.unwrap_or_default().to_string() }
  }
}
