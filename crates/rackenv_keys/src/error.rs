use thiserror::Error;

use crate::Key;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
  #[error("Environment key for {0:?} must not be empty")]
  EmptyKey(Key),
  #[error("Environment key {name:?} is already bound to {existing:?}")]
  DuplicateKey { name: &'static str, existing: Key },
}
