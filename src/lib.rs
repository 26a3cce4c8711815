//! Translation of HTTP requests into CGI/Rack environments.

pub mod config;
pub mod environment;
pub mod error;
pub mod input;
pub mod request;
pub mod service;
pub mod translator;
mod util;

pub use rackenv_keys as keys;

pub use crate::environment::Environment;
pub use crate::error::TranslateError;
pub use crate::input::Input;
pub use crate::request::ConnectionInfo;
pub use crate::request::RawHeader;
pub use crate::request::RawRequest;
pub use crate::request::ServerIdentity;
pub use crate::translator::Translator;
