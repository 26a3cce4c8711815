use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::input::Input;

/// The CGI/Rack environment of a single request.
///
/// String variables are read-only once the environment leaves the translator. The body lives
/// under [`Environment::input_key`] and is claimed once by the handler through
/// [`Environment::take_input`].
pub struct Environment<B> {
  vars: BTreeMap<String, String>,
  input_key: &'static str,
  input: Option<Input<B>>,
}

impl<B> Environment<B> {
  pub(crate) fn new(input_key: &'static str) -> Self {
    Self { vars: BTreeMap::new(), input_key, input: None }
  }

  pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.vars.insert(key.into(), value.into());
  }

  /// Inserts `value`, joining it to an existing value with `", "`.
  pub(crate) fn append(&mut self, key: String, value: &str) {
    match self.vars.entry(key) {
      Entry::Vacant(entry) => {
        entry.insert(value.to_string());
      }
      Entry::Occupied(mut entry) => {
        let joined = entry.get_mut();
        joined.push_str(", ");
        joined.push_str(value);
      }
    }
  }

  pub(crate) fn bind_input(&mut self, input: Input<B>) {
    self.input = Some(input);
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(String::as_str)
  }

  /// Whether `key` is present, counting an unclaimed input.
  pub fn contains_key(&self, key: &str) -> bool {
    self.vars.contains_key(key) || (key == self.input_key && self.input.is_some())
  }

  /// String variables in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.vars.iter().map(|(key, value)| (key.as_str(), value.as_str()))
  }

  pub fn vars(&self) -> &BTreeMap<String, String> {
    &self.vars
  }

  pub fn len(&self) -> usize {
    self.vars.len() + usize::from(self.input.is_some())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn input_key(&self) -> &'static str {
    self.input_key
  }

  /// Hands the body over to the caller. Returns `None` once it has been taken.
  pub fn take_input(&mut self) -> Option<Input<B>> {
    self.input.take()
  }
}

impl<B> fmt::Debug for Environment<B> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Environment")
      .field("vars", &self.vars)
      .field("input_key", &self.input_key)
      .field("input", &self.input.as_ref().map(Input::is_bound))
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use crate::environment::Environment;
  use crate::input::Input;

  #[test]
  fn test_append_joins_in_order() {
    let mut environment = Environment::<()>::new("rack.input");
    environment.append("HTTP_ACCEPT_ENCODING".to_string(), "gzip");
    environment.append("HTTP_ACCEPT_ENCODING".to_string(), "deflate");
    environment.append("HTTP_ACCEPT_ENCODING".to_string(), "br");
    assert_eq!(environment.get("HTTP_ACCEPT_ENCODING"), Some("gzip, deflate, br"));
  }

  #[test]
  fn test_insert_replaces() {
    let mut environment = Environment::<()>::new("rack.input");
    environment.insert("SERVER_PORT", "80");
    environment.insert("SERVER_PORT", "3001");
    assert_eq!(environment.get("SERVER_PORT"), Some("3001"));
    assert_eq!(environment.len(), 1);
  }

  #[test]
  fn test_take_input_once() {
    let mut environment = Environment::new("rack.input");
    environment.bind_input(Input::new(()));
    assert!(environment.contains_key("rack.input"));
    assert_eq!(environment.len(), 1);
    assert_eq!(environment.get("rack.input"), None);

    assert!(environment.take_input().is_some_and(|input| input.is_bound()));
    assert!(environment.take_input().is_none());
    assert!(!environment.contains_key("rack.input"));
    assert!(environment.is_empty());
  }

  #[test]
  fn test_debug_hides_body() {
    let mut environment = Environment::new("rack.input");
    environment.bind_input(Input::<()>::empty());
    let debug = format!("{environment:?}");
    assert!(debug.contains("input: Some(false)"));
  }
}
