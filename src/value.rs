//! Scalar values and ordered column maps.
//!
//! `Record` is used for every piece of structured input the builder accepts
//! (insert bodies, update set maps, where maps) and for result rows. Column
//! order is insertion order and is reflected verbatim in generated SQL.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value counts as "empty" for insert bodies.
    ///
    /// Zero, the empty string, `false` and empty blobs all collapse into
    /// `null` when inserted, the same as an explicit `Null`.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Integer(i) => *i == 0,
            Value::Real(f) => *f == 0.0 || f.is_nan(),
            Value::Text(s) => s.is_empty(),
            Value::Blob(b) => b.is_empty(),
            Value::Boolean(b) => !b,
        }
    }

    /// Render as a SQL literal. Text is emitted without escaping.
    pub(crate) fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Integer(i) => format!("'{i}'"),
            Value::Real(f) => format!("'{}'", real_literal(*f)),
            Value::Text(s) => format!("'{s}'"),
            Value::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Value::Boolean(b) => format!("'{}'", u8::from(*b)),
        }
    }
}

/// `Infinity`/`-Infinity` for infinities, `0` for both signed zeros.
fn real_literal(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        f.to_string()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<rusqlite::types::ValueRef<'_>> for Value {
    fn from(v: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

/// Ordered column -> value map.
///
/// Serializes as a map, keeping column order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

/// A row returned by a query.
pub type Row = Record;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value, replacing an existing column in place.
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            let k: String = k.into();
            record.insert(&k, v);
        }
        record
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((k, v)) = access.next_entry::<String, Value>()? {
                    record.insert(&k, v);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_insertion_order() {
        let record = Record::new()
            .with_value("b", 1)
            .with_value("a", 2)
            .with_value("c", 3);
        let cols: Vec<&str> = record.columns().collect();
        assert_eq!(cols, vec!["b", "a", "c"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let record = Record::new()
            .with_value("a", 1)
            .with_value("b", 2)
            .with_value("a", "x");
        assert_eq!(record.len(), 2);
        assert_eq!(record.columns().next(), Some("a"));
        assert_eq!(record.get("a"), Some(&Value::Text("x".into())));
    }

    #[test]
    fn falsy_values() {
        assert!(Value::Null.is_falsy());
        assert!(Value::Integer(0).is_falsy());
        assert!(Value::Real(0.0).is_falsy());
        assert!(Value::Real(f64::NAN).is_falsy());
        assert!(Value::Text(String::new()).is_falsy());
        assert!(Value::Boolean(false).is_falsy());
        assert!(Value::Blob(vec![]).is_falsy());

        assert!(!Value::Integer(-1).is_falsy());
        assert!(!Value::Text("0".into()).is_falsy());
        assert!(!Value::Boolean(true).is_falsy());
    }

    #[test]
    fn literals() {
        assert_eq!(Value::Integer(30).to_sql_literal(), "'30'");
        assert_eq!(Value::Real(30.0).to_sql_literal(), "'30'");
        assert_eq!(Value::Real(1.5).to_sql_literal(), "'1.5'");
        assert_eq!(Value::Real(-0.0).to_sql_literal(), "'0'");
        assert_eq!(Value::Real(f64::INFINITY).to_sql_literal(), "'Infinity'");
        assert_eq!(Value::Real(f64::NEG_INFINITY).to_sql_literal(), "'-Infinity'");
        assert_eq!(Value::Real(f64::NAN).to_sql_literal(), "'NaN'");
        assert_eq!(Value::Text("Ann".into()).to_sql_literal(), "'Ann'");
        assert_eq!(Value::Boolean(true).to_sql_literal(), "'1'");
        assert_eq!(Value::Blob(vec![0xde, 0x01]).to_sql_literal(), "X'DE01'");
        assert_eq!(Value::Null.to_sql_literal(), "null");
    }

    #[test]
    fn record_serializes_as_ordered_map() {
        let record = Record::new().with_value("z", 1).with_value("a", "x");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"z":1,"a":"x"}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<i64> = None;
        assert!(Value::from(none).is_null());
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }
}
