use std::fmt;
use std::net::IpAddr;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use rackenv_keys::DEFAULT_HOST;
use rackenv_keys::DEFAULT_PORT;
use regex::Regex;

use crate::error::ConfigError;

static PORT_ONLY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\A(?:\*:)?(\d+)\z").expect("valid regex"));
static IPV6: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\A\[([a-fA-F0-9:]+)\]:(\d+)\z").expect("valid regex"));
static HOST_PORT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\A(.+):(\d+)\z").expect("valid regex"));

/// The host and port the server is bound to.
///
/// Parsed from `3000`, `*:3000`, `127.0.0.1:3000`, `[::1]:3000` or a bare host name, which
/// keeps the default port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listen {
  host: String,
  port: u16,
}

impl Listen {
  pub fn new(host: impl Into<String>, port: u16) -> Self {
    Self { host: host.into(), port }
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn port(&self) -> u16 {
    self.port
  }
}

impl Default for Listen {
  fn default() -> Self {
    Self::new(DEFAULT_HOST, DEFAULT_PORT)
  }
}

impl FromStr for Listen {
  type Err = ConfigError;

  fn from_str(address: &str) -> Result<Self, Self::Err> {
    let invalid = || ConfigError::InvalidListen(address.to_string());
    let port = |port: &str| port.parse::<u16>().map_err(|_| invalid());

    if let Some(captures) = PORT_ONLY.captures(address) {
      return Ok(Self::new("0.0.0.0", port(&captures[1])?));
    }
    if let Some(captures) = IPV6.captures(address) {
      let ip = captures[1].parse::<Ipv6Addr>().map_err(|_| invalid())?;
      return Ok(Self::new(ip.to_string(), port(&captures[2])?));
    }
    if let Some(captures) = HOST_PORT.captures(address) {
      let host = match captures[1].parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => ip.to_string(),
        // IPv6 hosts must be bracketed.
        Ok(IpAddr::V6(_)) => return Err(invalid()),
        Err(_) if captures[1].contains([':', '[', ']']) => return Err(invalid()),
        Err(_) => captures[1].to_string(),
      };
      return Ok(Self::new(host, port(&captures[2])?));
    }
    if address.is_empty() || address.contains([':', '[', ']', '/', ' ']) {
      return Err(invalid());
    }
    Ok(Self::new(address, DEFAULT_PORT))
  }
}

impl fmt::Display for Listen {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.host.parse::<Ipv6Addr>() {
      Ok(_) => write!(f, "[{}]:{}", self.host, self.port),
      Err(_) => write!(f, "{}:{}", self.host, self.port),
    }
  }
}

#[cfg(test)]
mod tests {
  use rstest::rstest;

  use crate::config::listen::Listen;
  use crate::error::ConfigError;

  #[rstest]
  #[case("3000", "0.0.0.0", 3000)]
  #[case("*:3000", "0.0.0.0", 3000)]
  #[case("127.0.0.1:3000", "127.0.0.1", 3000)]
  #[case("[::1]:3000", "::1", 3000)]
  #[case::ipv6_canonicalized("[0:0:0:0:0:0:0:1]:80", "::1", 80)]
  #[case("localhost:8080", "localhost", 8080)]
  #[case::bare_host("example.com", "example.com", 3001)]
  fn test_parse(#[case] address: &str, #[case] host: &str, #[case] port: u16) {
    let listen = address.parse::<Listen>().unwrap();
    assert_eq!(listen, Listen::new(host, port));
  }

  #[rstest]
  #[case::empty("")]
  #[case::port_out_of_range("70000")]
  #[case::bad_ipv6("[::g]:80")]
  #[case::unbracketed_ipv6("::1:80")]
  #[case::missing_port("localhost:")]
  fn test_parse_rejected(#[case] address: &str) {
    let err = address.parse::<Listen>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidListen(value) if value == address));
  }

  #[rstest]
  #[case(Listen::new("127.0.0.1", 3000), "127.0.0.1:3000")]
  #[case(Listen::new("::1", 3000), "[::1]:3000")]
  #[case(Listen::default(), "localhost:3001")]
  fn test_display(#[case] listen: Listen, #[case] expected: &str) {
    assert_eq!(listen.to_string(), expected);
  }
}
