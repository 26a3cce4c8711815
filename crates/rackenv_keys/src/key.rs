/// Logical concepts of a CGI/Rack environment.
///
/// Every variant has exactly one canonical key string, see [`Key::canonical`]. The set is closed:
/// header fields without a dedicated variant are folded into `HTTP_*` keys by the translator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
  RequestMethod,
  RequestPath,
  RequestUri,
  PathInfo,
  QueryString,
  ServerName,
  ServerPort,
  ServerSoftware,
  ServerProtocol,
  GatewayInterface,
  /// Negotiated HTTP wire version, kept apart from `SERVER_PROTOCOL`.
  ///
  /// Deliberately not the conventional `HTTP_VERSION`, which a `Version` request header would
  /// fold into.
  RequestProtocol,
  RemoteAddr,
  RemotePort,
  HttpHost,
  HttpUserAgent,
  HttpAccept,
  HttpCookie,
  HttpAcceptLanguage,
  HttpAcceptEncoding,
  HttpConnection,
  ContentType,
  ContentLength,
  /// The request body stream.
  Input,
}

impl Key {
  pub const COUNT: usize = 23;

  pub const ALL: [Key; Key::COUNT] = [
    Key::RequestMethod,
    Key::RequestPath,
    Key::RequestUri,
    Key::PathInfo,
    Key::QueryString,
    Key::ServerName,
    Key::ServerPort,
    Key::ServerSoftware,
    Key::ServerProtocol,
    Key::GatewayInterface,
    Key::RequestProtocol,
    Key::RemoteAddr,
    Key::RemotePort,
    Key::HttpHost,
    Key::HttpUserAgent,
    Key::HttpAccept,
    Key::HttpCookie,
    Key::HttpAcceptLanguage,
    Key::HttpAcceptEncoding,
    Key::HttpConnection,
    Key::ContentType,
    Key::ContentLength,
    Key::Input,
  ];

  pub const fn canonical(self) -> &'static str {
    match self {
      Key::RequestMethod => "REQUEST_METHOD",
      Key::RequestPath => "REQUEST_PATH",
      Key::RequestUri => "REQUEST_URI",
      Key::PathInfo => "PATH_INFO",
      Key::QueryString => "QUERY_STRING",
      Key::ServerName => "SERVER_NAME",
      Key::ServerPort => "SERVER_PORT",
      Key::ServerSoftware => "SERVER_SOFTWARE",
      Key::ServerProtocol => "SERVER_PROTOCOL",
      Key::GatewayInterface => "GATEWAY_INTERFACE",
      Key::RequestProtocol => "REQUEST_PROTOCOL",
      Key::RemoteAddr => "REMOTE_ADDR",
      Key::RemotePort => "REMOTE_PORT",
      Key::HttpHost => "HTTP_HOST",
      Key::HttpUserAgent => "HTTP_USER_AGENT",
      Key::HttpAccept => "HTTP_ACCEPT",
      Key::HttpCookie => "HTTP_COOKIE",
      Key::HttpAcceptLanguage => "HTTP_ACCEPT_LANGUAGE",
      Key::HttpAcceptEncoding => "HTTP_ACCEPT_ENCODING",
      Key::HttpConnection => "HTTP_CONNECTION",
      Key::ContentType => "Content-Type",
      Key::ContentLength => "Content-Length",
      Key::Input => "rack.input",
    }
  }

  /// The dedicated key of a header field, if it has one.
  ///
  /// `name` must already be lower-cased.
  pub fn for_header(name: &str) -> Option<Key> {
    let key = match name {
      "host" => Key::HttpHost,
      "user-agent" => Key::HttpUserAgent,
      "accept" => Key::HttpAccept,
      "cookie" => Key::HttpCookie,
      "accept-language" => Key::HttpAcceptLanguage,
      "accept-encoding" => Key::HttpAcceptEncoding,
      "connection" => Key::HttpConnection,
      "content-type" => Key::ContentType,
      "content-length" => Key::ContentLength,
      _ => return None,
    };
    Some(key)
  }

  pub(crate) const fn index(self) -> usize {
    self as usize
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use rstest::rstest;

  use crate::Key;

  #[test]
  fn test_canonical_keys_are_unique() {
    let keys = Key::ALL.iter().map(|key| key.canonical()).collect::<HashSet<_>>();
    assert_eq!(keys.len(), Key::COUNT);
  }

  #[test]
  fn test_all_is_in_declaration_order() {
    for (index, key) in Key::ALL.iter().enumerate() {
      assert_eq!(key.index(), index);
    }
  }

  #[rstest]
  #[case("host", Some(Key::HttpHost))]
  #[case("accept-encoding", Some(Key::HttpAcceptEncoding))]
  #[case("content-type", Some(Key::ContentType))]
  #[case("content-length", Some(Key::ContentLength))]
  #[case::not_lowercased("Host", None)]
  #[case::no_dedicated_key("x-request-id", None)]
  #[case::version_has_no_dedicated_key("version", None)]
  fn test_for_header(#[case] name: &str, #[case] expected: Option<Key>) {
    assert_eq!(Key::for_header(name), expected);
  }

  #[test]
  fn test_content_headers_are_not_prefixed() {
    assert_eq!(Key::ContentType.canonical(), "Content-Type");
    assert_eq!(Key::ContentLength.canonical(), "Content-Length");
  }

  #[test]
  fn test_wire_version_key() {
    assert_eq!(Key::RequestProtocol.canonical(), "REQUEST_PROTOCOL");
    assert!(Key::ALL.iter().all(|key| key.canonical() != "HTTP_VERSION"));
  }
}
