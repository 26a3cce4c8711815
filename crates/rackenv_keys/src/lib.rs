//! Canonical CGI/Rack environment keys and protocol constants.

mod error;
mod key;
mod registry;

pub use crate::error::RegistryError;
pub use crate::key::Key;
pub use crate::registry::ProtocolVersion;
pub use crate::registry::Registry;

pub const GET: &str = "GET";
pub const POST: &str = "POST";

pub const HTTP_10: &str = "HTTP/1.0";
pub const HTTP_11: &str = "HTTP/1.1";

/// Value of `SERVER_PROTOCOL` and `GATEWAY_INTERFACE`.
pub const CGI_VER: &str = "CGI/1.2";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3001;
