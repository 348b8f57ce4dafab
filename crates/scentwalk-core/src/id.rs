//! Strongly-typed identifiers for cached fields and walkers.

use std::fmt;

/// Identifies a cached attraction field (and the path it was built from,
/// if any) within a simulation session.
///
/// Keys are free-form strings chosen by the caller, e.g. `"entrance-exit"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(String);

impl FieldKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifies a walker within a simulation session.
///
/// Assigned sequentially by the session; also used to derive each walker's
/// RNG stream so that batch runs are reproducible regardless of thread
/// scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalkerId(pub u32);

impl fmt::Display for WalkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WalkerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_key_conversions_agree() {
        let a = FieldKey::from("entrance-exit");
        let b = FieldKey::new(String::from("entrance-exit"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "entrance-exit");
        assert_eq!(a.to_string(), "entrance-exit");
    }

    #[test]
    fn walker_ids_order_numerically() {
        assert!(WalkerId(2) < WalkerId(10));
        assert_eq!(WalkerId::from(7).to_string(), "7");
    }
}
