mod inspect;

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use clap_verbosity_flag::InfoLevel;
use clap_verbosity_flag::Verbosity;
use rackenv::config::Config;
use rackenv::config::DEFAULT_CONFIG_FILE;
use rackenv::config::listen::Listen;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::cli::inspect::Inspect;

pub trait Executable {
  async fn execute(self) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, clap::Parser)]
#[command(version, about, author)]
pub struct Cli {
  #[arg(default_value = "-", help = "Raw HTTP/1.x request to translate, `-` reads stdin")]
  request: PathBuf,
  #[arg(short, long, env = "RACKENV_CONFIG", help = "TOML config file [default: rackenv.toml]")]
  config: Option<PathBuf>,
  #[arg(short, long, env = "RACKENV_LISTEN", value_name = "[HOST:]PORT", value_parser = parse_listen)]
  listen: Option<Listen>,
  #[arg(short, long, env = "RACKENV_SOFTWARE", help = "SERVER_SOFTWARE value")]
  software: Option<String>,
  #[command(flatten)]
  verbosity: Verbosity<InfoLevel>,
}

impl Cli {
  pub(crate) fn verbosity(&self) -> Verbosity<InfoLevel> {
    self.verbosity
  }

  fn config(&self) -> anyhow::Result<Config> {
    let cli = Config::from((self.listen.clone(), self.software.clone()));
    let file = match &self.config {
      Some(path) => Config::from_file(path)?,
      None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
        Config::from_file(DEFAULT_CONFIG_FILE)?
      }
      None => Config::default(),
    };
    Ok(cli.or(file))
  }

  async fn read_request(&self) -> anyhow::Result<Bytes> {
    let mut buf = Vec::new();
    if self.request.as_os_str() == "-" {
      tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .context("Failed to read request from stdin")?;
    } else {
      buf = tokio::fs::read(&self.request)
        .await
        .with_context(|| format!("Failed to read request file: {}", self.request.display()))?;
    }
    Ok(Bytes::from(buf))
  }
}

impl Executable for Cli {
  async fn execute(self) -> anyhow::Result<()> {
    let config = self.config()?;
    debug!("Using {config:?}");

    let request = self.read_request().await?;
    Inspect::new(config.server_identity(), request).execute().await
  }
}

fn parse_listen(arg: &str) -> anyhow::Result<Listen> {
  Ok(arg.parse()?)
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use clap::Parser;
  use clap_verbosity_flag::Verbosity;
  use clap_verbosity_flag::VerbosityFilter;
  use proptest::prelude::*;
  use rackenv::config::listen::Listen;
  use rackenv::request::ServerIdentity;

  use crate::cli::Cli;
  use crate::cli::parse_listen;

  proptest! {
    #[test]
    fn test_verbosity(verbose in 0..3u8, quiet in 0..=3u8) {
      let cli = Cli {
        request: PathBuf::from("-"),
        config: None,
        listen: None,
        software: None,
        verbosity: Verbosity::new(verbose, quiet),
      };

      let expected = match (verbose as i16) - (quiet as i16) {
        -3 => VerbosityFilter::Off,
        -2 => VerbosityFilter::Error,
        -1 => VerbosityFilter::Warn,
        0 => VerbosityFilter::Info,
        1 => VerbosityFilter::Debug,
        2 => VerbosityFilter::Trace,
        _ => unreachable!(),
      };
      assert_eq!(cli.verbosity().filter(), expected);
    }
  }

  #[test]
  fn test_parse_listen() {
    assert_eq!(parse_listen("8080").unwrap(), Listen::new("0.0.0.0", 8080));
    assert!(parse_listen("localhost:").is_err());
  }

  #[test]
  fn test_cli_overrides_config_file() {
    let cli = Cli::parse_from([
      "rackenv",
      "--config",
      "tests/fixtures/rackenv.toml",
      "--listen",
      "10.0.0.1:80",
      "request.http",
    ]);
    assert_eq!(cli.request, PathBuf::from("request.http"));

    let config = cli.config().unwrap();
    assert_eq!(config.server_identity(), ServerIdentity::new("Fixture/1.0", "10.0.0.1", 80));
  }

  #[test]
  fn test_missing_config_file() {
    let cli = Cli::parse_from(["rackenv", "--config", "tests/fixtures/missing.toml"]);
    assert!(cli.config().is_err());
  }
}
