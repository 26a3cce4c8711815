use std::fmt;

use crate::Key;
use crate::error::RegistryError;

/// Version of the handler interface, independent of the HTTP wire version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProtocolVersion {
  major: u16,
  minor: u16,
}

impl ProtocolVersion {
  pub const RACK: Self = Self::new(1, 1);

  pub const fn new(major: u16, minor: u16) -> Self {
    Self { major, minor }
  }

  pub const fn major(self) -> u16 {
    self.major
  }

  pub const fn minor(self) -> u16 {
    self.minor
  }

  pub fn to_array(self) -> [String; 2] {
    [self.major.to_string(), self.minor.to_string()]
  }
}

impl fmt::Display for ProtocolVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// Immutable catalog of environment key strings.
///
/// The registry is a plain `Copy` value handed to whoever builds environments, so a custom
/// catalog can stand in for [`Registry::rack`] without touching global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registry {
  keys: [&'static str; Key::COUNT],
  version: ProtocolVersion,
}

impl Registry {
  /// The canonical Rack catalog.
  pub const fn rack() -> Self {
    let mut keys = [""; Key::COUNT];
    let mut index = 0;
    while index < Key::COUNT {
      keys[index] = Key::ALL[index].canonical();
      index += 1;
    }
    Self { keys, version: ProtocolVersion::RACK }
  }

  pub fn key(&self, key: Key) -> &'static str {
    self.keys[key.index()]
  }

  /// Reverse lookup of a key string.
  pub fn lookup(&self, name: &str) -> Option<Key> {
    self.iter().find_map(|(key, candidate)| (candidate == name).then_some(key))
  }

  pub fn iter(&self) -> impl Iterator<Item = (Key, &'static str)> + '_ {
    Key::ALL.iter().map(|key| (*key, self.key(*key)))
  }

  /// Rebinds `key` to `name`.
  ///
  /// Fails when `name` is empty or already bound to another concept.
  pub fn with_key(mut self, key: Key, name: &'static str) -> Result<Self, RegistryError> {
    if name.is_empty() {
      return Err(RegistryError::EmptyKey(key));
    }
    if let Some(existing) = self.lookup(name)
      && existing != key
    {
      return Err(RegistryError::DuplicateKey { name, existing });
    }

    self.keys[key.index()] = name;
    Ok(self)
  }

  pub fn with_version(mut self, version: ProtocolVersion) -> Self {
    self.version = version;
    self
  }

  pub fn protocol_version(&self) -> ProtocolVersion {
    self.version
  }

  /// The handler interface version as an ordered pair, e.g. `["1", "1"]`.
  pub fn version(&self) -> [String; 2] {
    self.version.to_array()
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::rack()
  }
}
