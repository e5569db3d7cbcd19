//! Header collections.

/// Ordered, case-insensitive, multi-valued header collection.
///
/// Keys keep the spelling they were first inserted with and are yielded in
/// insertion order. Values under one key keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Appends a value to a header.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Sets a header value, replacing any existing values.
    ///
    /// An existing key keeps its position and spelling.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => &self.entries[index].1,
            None => &[],
        }
    }

    /// Returns true if the header has at least one value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }

    /// Removes all values for a header.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    /// Returns the number of distinct header keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
