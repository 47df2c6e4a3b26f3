use indexmap::IndexMap;

use crate::error::Error;

/// Labels and constants of one assembly run, in definition order.
#[derive(Debug, Default)]
pub struct Symbols(IndexMap<String, i64>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    /// Each name is defined exactly once.
    pub fn insert(&mut self, name: &str, value: i64) -> Result<(), Error> {
        if self.0.contains_key(name) {
            return Err(Error::DuplicateLabel(name.to_string()));
        }
        self.0.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
