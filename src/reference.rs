//! Non-owning references to scope entries.
//!
//! A [`Reference`] pairs a borrowed [`Scope`] with the key of one of its
//! entries and resolves the key whenever it is asked for the value. It never
//! owns the target, and the borrow ties its lifetime to the scope's.
//!
//! ```rust
//! use skopik::{parse_str, Reference};
//!
//! let root = parse_str("primary:{ host = db1 }; port = 5432").unwrap();
//! let primary = Reference::by_name(&root, "primary").unwrap();
//! assert_eq!(primary.get().and_then(|v| v.get("host")).and_then(|v| v.as_str()), Some("db1"));
//!
//! assert!(Reference::by_name(&root, "replica").is_err());
//! ```

use crate::error::{Error, Result};
use crate::value::{Scope, Value};
use std::fmt;

/// A lookup handle for one entry of a scope.
#[derive(Clone, Copy, Debug)]
pub struct Reference<'a> {
    scope: &'a Scope,
    key: &'a str,
}

impl<'a> Reference<'a> {
    /// References the entry called `name`.
    pub fn by_name(scope: &'a Scope, name: &str) -> Result<Self> {
        match scope.entries().get_key_value(name) {
            Some((key, _)) => Ok(Reference { scope, key }),
            None => Err(Error::reference(format!(
                "'{}' is not an entry of {}",
                name,
                describe(scope)
            ))),
        }
    }

    /// References the entry that *is* `value`: identity, not equality.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::{parse_str, Reference, Value};
    ///
    /// let root = parse_str("a = 1; b = 1").unwrap();
    /// let b = root.get("b").unwrap();
    /// assert_eq!(Reference::by_value(&root, b).unwrap().key(), "b");
    ///
    /// let lookalike = Value::from(1);
    /// assert!(Reference::by_value(&root, &lookalike).is_err());
    /// ```
    pub fn by_value(scope: &'a Scope, value: &Value) -> Result<Self> {
        match scope.iter().find(|(_, entry)| std::ptr::eq(*entry, value)) {
            Some((key, _)) => Ok(Reference { scope, key }),
            None => Err(Error::reference(format!(
                "the {} value is not an entry of {}",
                value.kind(),
                describe(scope)
            ))),
        }
    }

    #[must_use]
    pub fn key(&self) -> &'a str {
        self.key
    }

    #[must_use]
    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    /// Resolves the reference.
    #[must_use]
    pub fn get(&self) -> Option<&'a Value> {
        self.scope.get(self.key)
    }
}

fn describe(scope: &Scope) -> String {
    if scope.is_anonymous() {
        "an anonymous scope".to_string()
    } else {
        format!("scope '{}'", scope.name())
    }
}

impl fmt::Display for Reference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_anonymous() {
            write!(f, "@{}", self.key)
        } else {
            write!(f, "@{}.{}", self.scope.name(), self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scope {
        let mut scope = Scope::named("cfg");
        scope.insert("x", Value::from(1));
        scope.insert("y", Value::from("why"));
        scope
    }

    #[test]
    fn test_by_name_resolves() {
        let scope = sample();
        let reference = Reference::by_name(&scope, "y").unwrap();
        assert_eq!(reference.key(), "y");
        assert_eq!(reference.get().and_then(Value::as_str), Some("why"));
        assert_eq!(reference.to_string(), "@cfg.y");
        assert!(std::ptr::eq(reference.scope(), &scope));
        let stored = scope.entries().get_index(1).unwrap().0;
        assert!(std::ptr::eq(reference.key(), stored.as_str()));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let scope = sample();
        let err = Reference::by_name(&scope, "z").unwrap_err();
        assert!(matches!(err, Error::Reference(_)));
        assert!(err.to_string().contains("scope 'cfg'"));
    }

    #[test]
    fn test_by_value_uses_identity() {
        let scope = sample();
        let x = scope.get("x").unwrap();
        assert_eq!(Reference::by_value(&scope, x).unwrap().key(), "x");

        let copy = x.clone();
        assert!(Reference::by_value(&scope, &copy).is_err());
    }
}
