use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
  /// The method or target cannot be used. Fatal to the request.
  #[error("Malformed request line: {0}")]
  MalformedRequestLine(#[from] RequestLineError),
  /// A single header field is unusable. Recovered by skipping it.
  #[error("Malformed header {name:?}: {reason}")]
  MalformedHeader { name: String, reason: HeaderError },
}

impl TranslateError {
  /// The status the connection layer should answer with.
  pub fn status(&self) -> StatusCode {
    StatusCode::BAD_REQUEST
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestLineError {
  #[error("empty method")]
  EmptyMethod,
  #[error("invalid method token {0:?}")]
  InvalidMethod(String),
  #[error("empty request target")]
  EmptyTarget,
  #[error("unsupported request target form {0:?}")]
  UnsupportedTarget(String),
  #[error("invalid request target {0:?}")]
  InvalidTarget(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
  #[error("empty name")]
  EmptyName,
  #[error("invalid name")]
  InvalidName,
  #[error("invalid value")]
  InvalidValue,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Invalid listen address {0:?}")]
  InvalidListen(String),
  #[error("Failed to read config file: {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse config file: {}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}
