//! PDF dictionaries.
//!
//! A [`Dictionary`] is a thin syntactic view over parsed key/value pairs.
//! Values may be direct objects or indirect references; references are
//! resolved on every read through a caller-supplied [`Resolver`] and never
//! cached back into the dictionary.

use crate::error::{Error, MismatchCause, Result};
use crate::object::Object;
use crate::resolve::{resolve, Resolver};
use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Mapping from name to object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, Object>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Object) -> Option<Object> {
        self.entries.insert(key.into(), value)
    }

    /// Raw stored value, references left unresolved.
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over raw entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the value at `key`, resolving an indirect reference if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyNotFound`] if the key is absent
    /// - [`Error::Unresolved`] if the stored reference cannot be resolved
    pub fn get_object<R: Resolver + ?Sized>(&self, key: &str, resolver: &R) -> Result<Object> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;

        match value {
            Object::Reference(reference) => {
                resolve(value, resolver).map_err(|e| Error::Unresolved {
                    key: key.to_string(),
                    reference: *reference,
                    source: Box::new(e),
                })
            },
            direct => Ok(direct.clone()),
        }
    }

    /// Get the value at `key` as a 32-bit integer.
    ///
    /// The resolved object's serialization must be a base-10 integer literal
    /// that fits in `i32`.
    pub fn get_int<R: Resolver + ?Sized>(&self, key: &str, resolver: &R) -> Result<i32> {
        self.parse_integer(key, resolver, "int32")
    }

    /// Get the value at `key` as a 64-bit integer.
    pub fn get_int64<R: Resolver + ?Sized>(&self, key: &str, resolver: &R) -> Result<i64> {
        self.parse_integer(key, resolver, "int64")
    }

    fn parse_integer<T, R>(&self, key: &str, resolver: &R, expected: &'static str) -> Result<T>
    where
        T: FromStr<Err = ParseIntError>,
        R: Resolver + ?Sized,
    {
        let object = self.get_object(key, resolver)?;
        object
            .to_string()
            .parse::<T>()
            .map_err(|e| Error::TypeMismatch {
                key: key.to_string(),
                expected,
                cause: MismatchCause::InvalidInteger(e),
            })
    }

    /// Get the value at `key` as an array.
    pub fn get_array<R: Resolver + ?Sized>(&self, key: &str, resolver: &R) -> Result<Vec<Object>> {
        match self.get_object(key, resolver)? {
            Object::Array(items) => Ok(items),
            other => Err(mismatch(key, "Array", &other)),
        }
    }

    /// Get the value at `key` as a dictionary.
    pub fn get_dictionary<R: Resolver + ?Sized>(
        &self,
        key: &str,
        resolver: &R,
    ) -> Result<Dictionary> {
        match self.get_object(key, resolver)? {
            Object::Dictionary(dict) => Ok(dict),
            other => Err(mismatch(key, "Dictionary", &other)),
        }
    }

    /// Get the value at `key` as a name.
    pub fn get_name<R: Resolver + ?Sized>(&self, key: &str, resolver: &R) -> Result<String> {
        match self.get_object(key, resolver)? {
            Object::Name(name) => Ok(name),
            other => Err(mismatch(key, "Name", &other)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &Object) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected,
        cause: MismatchCause::WrongVariant {
            found: found.type_name(),
        },
    }
}

/// Debug form `<<key valuekey value>>`: bare keys, no separator between
/// entries, unspecified order. Not a PDF writer.
impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<<")?;
        for (key, value) in &self.entries {
            write!(f, "{} {}", key, value)?;
        }
        f.write_str(">>")
    }
}

impl From<HashMap<String, Object>> for Dictionary {
    fn from(entries: HashMap<String, Object>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, Object)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, Object)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a Object);
    type IntoIter = std::collections::hash_map::Iter<'a, String, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;
    use crate::resolve::ObjectTable;
    use std::error::Error as _;

    fn dict(entries: Vec<(&str, Object)>) -> Dictionary {
        entries.into_iter().collect()
    }

    #[test]
    fn test_get_object_direct() {
        let d = dict(vec![("Type", Object::Name("Page".to_string()))]);
        let obj = d.get_object("Type", &ObjectTable::new()).unwrap();
        assert_eq!(obj.as_name(), Some("Page"));
    }

    #[test]
    fn test_get_object_missing_key() {
        let d = Dictionary::new();
        let err = d.get_object("missing", &ObjectTable::new()).unwrap_err();
        assert!(matches!(&err, Error::KeyNotFound(k) if k == "missing"));
    }

    #[test]
    fn test_get_object_resolves_reference() {
        let table: ObjectTable = [(ObjectRef::new(5, 0), Object::Integer(42))]
            .into_iter()
            .collect();
        let d = dict(vec![("k", Object::Reference(ObjectRef::new(5, 0)))]);
        assert_eq!(d.get_object("k", &table).unwrap(), Object::Integer(42));
        // The stored value stays a reference
        assert_eq!(d.get("k"), Some(&Object::Reference(ObjectRef::new(5, 0))));
    }

    #[test]
    fn test_get_object_unresolvable_reference() {
        let d = dict(vec![("Root", Object::Reference(ObjectRef::new(3, 0)))]);
        let err = d.get_object("Root", &ObjectTable::new()).unwrap_err();
        assert_eq!(err.key(), Some("Root"));
        assert!(!matches!(err, Error::TypeMismatch { .. }));
        match err {
            Error::Unresolved { reference, source, .. } => {
                assert_eq!(reference, ObjectRef::new(3, 0));
                assert!(matches!(*source, Error::ObjectNotFound(3, 0)));
            },
            other => panic!("expected Unresolved, got {:?}", other),
        }
    }

    #[test]
    fn test_get_int() {
        let d = dict(vec![("Count", Object::Integer(3))]);
        assert_eq!(d.get_int("Count", &ObjectTable::new()).unwrap(), 3);
    }

    #[test]
    fn test_get_int_out_of_range() {
        let d = dict(vec![("Big", Object::Integer(i64::from(i32::MAX) + 1))]);
        let table = ObjectTable::new();
        let err = d.get_int("Big", &table).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref key, expected: "int32", cause: MismatchCause::InvalidInteger(_) }
                if key == "Big"
        ));
        assert_eq!(d.get_int64("Big", &table).unwrap(), i64::from(i32::MAX) + 1);
    }

    #[test]
    fn test_get_int_rejects_non_integer() {
        let table = ObjectTable::new();
        let d = dict(vec![
            ("Real", Object::Real(1.5)),
            ("Name", Object::Name("7".to_string())),
            ("Str", Object::String(b"7".to_vec())),
        ]);
        for key in ["Real", "Name", "Str"] {
            let err = d.get_int64(key, &table).unwrap_err();
            assert!(matches!(err, Error::TypeMismatch { .. }), "{} should mismatch", key);
            assert_eq!(err.key(), Some(key));
        }
    }

    #[test]
    fn test_get_int_integral_real() {
        // Serialization of 4.0 is "4"
        let d = dict(vec![("W", Object::Real(4.0))]);
        assert_eq!(d.get_int("W", &ObjectTable::new()).unwrap(), 4);
    }

    #[test]
    fn test_get_array() {
        let d = dict(vec![("Kids", Object::Array(vec![Object::Integer(1)]))]);
        assert_eq!(d.get_array("Kids", &ObjectTable::new()).unwrap(), vec![Object::Integer(1)]);
    }

    #[test]
    fn test_get_dictionary_on_array_is_mismatch() {
        let d = dict(vec![("k", Object::Array(vec![]))]);
        let err = d.get_dictionary("k", &ObjectTable::new()).unwrap_err();
        assert_eq!(err.to_string(), "Dictionary value at k is not Dictionary");
        assert_eq!(err.source().unwrap().to_string(), "found Array");
    }

    #[test]
    fn test_get_dictionary_nested() {
        let inner = dict(vec![("Font", Object::Name("F1".to_string()))]);
        let d = dict(vec![("Resources", Object::Dictionary(inner.clone()))]);
        assert_eq!(d.get_dictionary("Resources", &ObjectTable::new()).unwrap(), inner);
    }

    #[test]
    fn test_get_name() {
        let d = dict(vec![("Type", Object::Name("Catalog".to_string())), ("N", Object::Null)]);
        let table = ObjectTable::new();
        assert_eq!(d.get_name("Type", &table).unwrap(), "Catalog");
        assert!(d.get_name("N", &table).is_err());
    }

    #[test]
    fn test_display_single_entry() {
        let d = dict(vec![("Count", Object::Integer(3))]);
        assert_eq!(d.to_string(), "<<Count 3>>");
        assert_eq!(Dictionary::new().to_string(), "<<>>");
    }

    #[test]
    fn test_display_multiple_entries_unordered() {
        let d = dict(vec![("A", Object::Integer(1)), ("B", Object::Boolean(true))]);
        let s = d.to_string();
        assert!(s == "<<A 1B true>>" || s == "<<B trueA 1>>", "unexpected {}", s);
    }

    #[test]
    fn test_collection_helpers() {
        let mut d = Dictionary::new();
        assert!(d.is_empty());
        d.insert("A", Object::Null);
        assert!(d.insert("A", Object::Integer(1)).is_some());
        assert!(d.contains_key("A"));
        assert_eq!(d.len(), 1);
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!((&d).into_iter().count(), 1);
    }
}
