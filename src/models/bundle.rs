use indexmap::{IndexMap, map};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// A scalar value stored in a [`Bundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl BundleValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            BundleValue::Null => "null",
            BundleValue::Bool(_) => "bool",
            BundleValue::Int(_) => "int",
            BundleValue::Float(_) => "float",
            BundleValue::String(_) => "string",
        }
    }
}

impl From<bool> for BundleValue {
    fn from(value: bool) -> Self {
        BundleValue::Bool(value)
    }
}

impl From<i64> for BundleValue {
    fn from(value: i64) -> Self {
        BundleValue::Int(value)
    }
}

impl From<f64> for BundleValue {
    fn from(value: f64) -> Self {
        BundleValue::Float(value)
    }
}

impl From<String> for BundleValue {
    fn from(value: String) -> Self {
        BundleValue::String(value)
    }
}

impl From<&str> for BundleValue {
    fn from(value: &str) -> Self {
        BundleValue::String(value.to_owned())
    }
}

/// String-keyed container exchanged across the host / conference boundary.
///
/// Keys keep their insertion order. The JSON form is a flat object of scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(IndexMap<String, BundleValue>);

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&BundleValue> {
        self.0.get(key)
    }

    /// Reads a string value. Missing keys and explicit nulls both read as `None`.
    pub fn get_string(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None | Some(BundleValue::Null) => Ok(None),
            Some(BundleValue::String(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(type_mismatch(key, "string", other)),
        }
    }

    /// Reads a boolean value. Missing keys and explicit nulls both read as `None`.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None | Some(BundleValue::Null) => Ok(None),
            Some(BundleValue::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(type_mismatch(key, "bool", other)),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BundleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), BundleValue::String(value.into()));
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), BundleValue::Bool(value));
    }

    /// Removes a key, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<BundleValue> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> map::Iter<'_, String, BundleValue> {
        self.0.iter()
    }
}

fn type_mismatch(key: &str, expected: &'static str, found: &BundleValue) -> Error {
    warn!(key, expected, found = found.type_name(), "bundle value type mismatch");
    Error::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: found.type_name(),
    }
}

impl<K: Into<String>, V: Into<BundleValue>> FromIterator<(K, V)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Bundle {
    type Item = (String, BundleValue);
    type IntoIter = map::IntoIter<String, BundleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = (&'a String, &'a BundleValue);
    type IntoIter = map::Iter<'a, String, BundleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut bundle = Bundle::new();
        bundle.put_string("displayName", "Alice");
        bundle.put_bool("isHost", true);
        bundle.insert("nothing", BundleValue::Null);

        assert_eq!(bundle.get_string("displayName").unwrap(), Some("Alice"));
        assert_eq!(bundle.get_bool("isHost").unwrap(), Some(true));
        assert_eq!(bundle.get_string("missing").unwrap(), None);
        assert_eq!(bundle.get_bool("nothing").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch() {
        let mut bundle = Bundle::new();
        bundle.put_string("isHost", "yes");

        match bundle.get_bool("isHost") {
            Err(Error::TypeMismatch {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "isHost");
                assert_eq!(expected, "bool");
                assert_eq!(found, "string");
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        assert!(bundle.get_string("isHost").is_ok());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut bundle: Bundle = [("b", true), ("a", false), ("c", true)]
            .into_iter()
            .collect();
        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);

        assert_eq!(bundle.remove("a"), Some(BundleValue::Bool(false)));
        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_json_scalars() {
        let bundle =
            Bundle::from_json(r#"{"s":"x","b":true,"i":3,"f":1.5,"n":null}"#).unwrap();

        assert_eq!(bundle.get("s"), Some(&BundleValue::String("x".to_owned())));
        assert_eq!(bundle.get("b"), Some(&BundleValue::Bool(true)));
        assert_eq!(bundle.get("i"), Some(&BundleValue::Int(3)));
        assert_eq!(bundle.get("f"), Some(&BundleValue::Float(1.5)));
        assert_eq!(bundle.get("n"), Some(&BundleValue::Null));

        let json = bundle.to_json().unwrap();
        assert_eq!(json, r#"{"s":"x","b":true,"i":3,"f":1.5,"n":null}"#);
    }

    #[test]
    fn test_json_rejects_nested_values() {
        assert!(matches!(
            Bundle::from_json(r#"{"list":[1,2]}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            Bundle::from_json(r#"{"inner":{"a":1}}"#),
            Err(Error::Json(_))
        ));
    }
}
