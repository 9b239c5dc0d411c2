use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One named value attached to a point or trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Real(f64),
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Real,
    Integer,
    Text,
    Timestamp,
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Real(_) => PropertyKind::Real,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Timestamp(_) => PropertyKind::Timestamp,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        PropertyValue::Real(x)
    }
}

impl From<i64> for PropertyValue {
    fn from(x: i64) -> Self {
        PropertyValue::Integer(x)
    }
}

impl From<String> for PropertyValue {
    fn from(x: String) -> Self {
        PropertyValue::Text(x)
    }
}

impl From<&str> for PropertyValue {
    fn from(x: &str) -> Self {
        PropertyValue::Text(x.to_string())
    }
}

impl From<NaiveDateTime> for PropertyValue {
    fn from(x: NaiveDateTime) -> Self {
        PropertyValue::Timestamp(x)
    }
}

/// Named values of mixed kinds. Each name holds exactly one kind at a time; setting a name again
/// replaces both the kind and the value.
///
/// Typed lookups return `None` both when the name is missing and when it's stored under a
/// different kind. Lookups never insert anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMap {
    inner: BTreeMap<String, PropertyValue>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Returns the previous value, of whatever kind.
    pub fn set<V: Into<PropertyValue>>(&mut self, name: &str, value: V) -> Option<PropertyValue> {
        self.inner.insert(name.to_string(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.inner.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.inner.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<PropertyKind> {
        self.inner.get(name).map(|value| value.kind())
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        match self.inner.get(name) {
            Some(PropertyValue::Real(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.inner.get(name) {
            Some(PropertyValue::Integer(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.inner.get(name) {
            Some(PropertyValue::Text(x)) => Some(x.as_str()),
            _ => None,
        }
    }

    pub fn timestamp(&self, name: &str) -> Option<NaiveDateTime> {
        match self.inner.get(name) {
            Some(PropertyValue::Timestamp(x)) => Some(*x),
            _ => None,
        }
    }

    /// Visits every property in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_str())
    }

    pub fn iter_kind(&self, kind: PropertyKind) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.iter().filter(move |(_, v)| v.kind() == kind)
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
