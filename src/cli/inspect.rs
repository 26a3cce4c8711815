use std::fmt::Write;

use anyhow::Context;
use anyhow::bail;
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Version;
use rackenv::Environment;
use rackenv::keys::HTTP_10;
use rackenv::keys::HTTP_11;
use rackenv::request::ConnectionInfo;
use rackenv::request::RawHeader;
use rackenv::request::RawRequest;
use rackenv::request::ServerIdentity;
use rackenv::translator::Translator;
use tracing::info;

use crate::cli::Executable;

const INITIAL_HEADERS: usize = 64;

/// Translates one raw request and prints its environment.
#[derive(Debug)]
pub struct Inspect {
  server: ServerIdentity,
  request: Bytes,
}

impl Inspect {
  pub fn new(server: ServerIdentity, request: Bytes) -> Self {
    Self { server, request }
  }
}

impl Executable for Inspect {
  async fn execute(self) -> anyhow::Result<()> {
    let (request, connection) = parse_request(self.request)?;
    let translator = Translator::default();
    let mut environment = translator.translate(request, &self.server, &connection)?;

    let body = match environment.take_input() {
      Some(input) => input.collect().await?.to_bytes(),
      None => Bytes::new(),
    };
    info!(
      method = environment.get("REQUEST_METHOD"),
      uri = environment.get("REQUEST_URI"),
      body = body.len(),
      "Translated request"
    );

    print!("{}", render(&environment, translator.registry().version(), body.len())?);
    Ok(())
  }
}

/// Parses a request head with `httparse`; everything after the head is the body.
///
/// The header buffer doubles until every header fits, so the header count is only bounded by
/// the size of the request.
fn parse_request(buf: Bytes) -> anyhow::Result<(RawRequest<Full<Bytes>>, ConnectionInfo)> {
  let mut config = httparse::ParserConfig::default();
  config.ignore_invalid_headers_in_requests(true);

  let mut capacity = INITIAL_HEADERS;
  loop {
    let mut headers = vec![httparse::EMPTY_HEADER; capacity];
    let mut parsed = httparse::Request::new(&mut headers);
    let status = match config.parse_request(&mut parsed, &buf) {
      Err(httparse::Error::TooManyHeaders) => {
        capacity *= 2;
        continue;
      }
      status => status.context("Malformed request head")?,
    };
    let httparse::Status::Complete(head_len) = status else {
      bail!("Incomplete request head");
    };
    return Ok(build_request(&parsed, buf.slice(head_len..)));
  }
}

fn build_request(
  parsed: &httparse::Request<'_, '_>,
  body: Bytes,
) -> (RawRequest<Full<Bytes>>, ConnectionInfo) {
  let (version, protocol) = match parsed.version {
    Some(0) => (Version::HTTP_10, HTTP_10),
    _ => (Version::HTTP_11, HTTP_11),
  };
  let mut request = RawRequest::new(
    parsed.method.unwrap_or_default(),
    parsed.path.unwrap_or_default(),
    Full::new(body),
  )
  .with_version(version);
  for header in parsed.headers.iter() {
    request.push_header(RawHeader::new(
      Bytes::copy_from_slice(header.name.as_bytes()),
      Bytes::copy_from_slice(header.value),
    ));
  }

  (request, ConnectionInfo::new(protocol))
}

fn render<B>(
  environment: &Environment<B>,
  version: [String; 2],
  body_len: usize,
) -> Result<String, std::fmt::Error> {
  let mut out = String::new();
  for (key, value) in environment.iter() {
    writeln!(out, "{key}={value}")?;
  }
  writeln!(out, "{}=<{body_len} bytes>", environment.input_key())?;
  writeln!(out, "rack.version={}", version.join(","))?;
  Ok(out)
}

#[cfg(test)]
mod tests {
  use bytes::Bytes;
  use hyper::Version;
  use rackenv::keys::POST;
  use rackenv::request::ServerIdentity;
  use rackenv::translator::Translator;

  use crate::cli::inspect::INITIAL_HEADERS;
  use crate::cli::inspect::parse_request;
  use crate::cli::inspect::render;

  #[test]
  fn test_parse_request() {
    let buf = Bytes::from_static(b"POST /form HTTP/1.0\r\nContent-Length: 3\r\n\r\nabc");
    let (request, connection) = parse_request(buf).unwrap();

    assert_eq!(request.method(), POST);
    assert_eq!(request.target(), "/form");
    assert_eq!(request.version(), Version::HTTP_10);
    assert_eq!(request.headers().len(), 1);
    assert_eq!(request.headers()[0].value(), b"3");
    assert_eq!(connection.protocol(), "HTTP/1.0");
  }

  #[test]
  fn test_parse_request_skips_invalid_header() {
    let buf =
      Bytes::from_static(b"GET / HTTP/1.1\r\nHost: a\r\nBad Header: x\r\nAccept: */*\r\n\r\n");
    let (request, _) = parse_request(buf).unwrap();

    let names = request.headers().iter().map(|header| header.name()).collect::<Vec<_>>();
    assert_eq!(names, [b"Host".as_slice(), b"Accept".as_slice()]);
  }

  #[test]
  fn test_parse_request_many_headers() {
    let count = INITIAL_HEADERS * 3 + 1;
    let mut head = String::from("GET / HTTP/1.1\r\n");
    for index in 0..count {
      head.push_str(&format!("X-Header-{index}: {index}\r\n"));
    }
    head.push_str("\r\n");

    let (request, _) = parse_request(Bytes::from(head)).unwrap();
    assert_eq!(request.headers().len(), count);
    assert_eq!(request.headers()[count - 1].value(), (count - 1).to_string().as_bytes());
  }

  #[test]
  fn test_parse_request_incomplete() {
    let err = parse_request(Bytes::from_static(b"GET / HTTP/1.1\r\nHost: a\r\n")).unwrap_err();
    assert_eq!(err.to_string(), "Incomplete request head");
  }

  #[test]
  fn test_render() {
    let buf = Bytes::from_static(b"GET /?q=1 HTTP/1.1\r\nHost: example.com\r\n\r\n");
    let (request, connection) = parse_request(buf).unwrap();
    let server = ServerIdentity::new("test/1.0", "localhost", 3001);
    let environment = Translator::default().translate(request, &server, &connection).unwrap();

    let rendered = render(&environment, ["1".to_string(), "1".to_string()], 0).unwrap();
    let lines = rendered.lines().collect::<Vec<_>>();
    assert_eq!(lines.first(), Some(&"GATEWAY_INTERFACE=CGI/1.2"));
    assert!(lines.contains(&"HTTP_HOST=example.com"));
    assert!(lines.contains(&"QUERY_STRING=q=1"));
    assert_eq!(lines[lines.len() - 2..], ["rack.input=<0 bytes>", "rack.version=1,1"]);
  }
}
