pub mod listen;

use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;

use crate::config::listen::Listen;
use crate::error::ConfigError;
use crate::request::ServerIdentity;

/// File name looked up in the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "rackenv.toml";

/// Settings read from a TOML file.
///
/// ```toml
/// listen = "127.0.0.1:3001"
/// software = "rackenv/0.1.0"
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  #[serde(deserialize_with = "deserialize_listen")]
  listen: Option<Listen>,
  software: Option<String>,
}

impl Config {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    toml::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
  }

  pub fn listen(&self) -> Option<&Listen> {
    self.listen.as_ref()
  }

  pub fn software(&self) -> Option<&str> {
    self.software.as_deref()
  }

  /// Fills the gaps of `self` with `fallback`.
  pub fn or(self, fallback: Config) -> Config {
    Config {
      listen: self.listen.or(fallback.listen),
      software: self.software.or(fallback.software),
    }
  }

  pub fn server_identity(&self) -> ServerIdentity {
    let default = ServerIdentity::default();
    let listen = self.listen.clone().unwrap_or_default();
    ServerIdentity::new(
      self.software.as_deref().unwrap_or(default.software()),
      listen.host(),
      listen.port(),
    )
  }
}

impl From<(Option<Listen>, Option<String>)> for Config {
  fn from((listen, software): (Option<Listen>, Option<String>)) -> Self {
    Self { listen, software }
  }
}

fn deserialize_listen<'de, D>(deserializer: D) -> Result<Option<Listen>, D::Error>
where
  D: Deserializer<'de>,
{
  String::deserialize(deserializer)?.parse().map(Some).map_err(serde::de::Error::custom)
}
