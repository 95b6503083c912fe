//! Value type definitions for Weft view-models.
//!
//! This module defines the `Value` enum which represents the plain data a
//! view-model observes: scalars, arrays and insertion-ordered objects.

use crate::error::{Error, Result};
use crate::path::{Path, Segment};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

/// A plain data value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absent or null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Number (stored as f64)
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object with keys kept in insertion order
    Object(Object),
}

/// An object whose entries keep the order in which they were inserted.
///
/// Enumeration order drives graph construction and template traversal, so
/// it is part of the data and never depends on hashing.
#[derive(Clone, Debug, Default)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    /// Creates a new empty object.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an object with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Gets a mutable value by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.position(key).map(move |idx| &mut self.entries[idx].1)
    }

    /// Inserts a key-value pair.
    ///
    /// An existing key keeps its position; a new key is appended. Returns the
    /// replaced value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes a key and returns its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Returns true if the object contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns an iterator over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns an iterator over key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries
            .iter()
            .zip(other.entries.iter())
            .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

impl Value {
    /// Returns true if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an array or an object, i.e. a value whose
    /// members are observed individually.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Returns the boolean value if this is a Bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number value if this is a Number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Gets a value by key if this is an Object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Gets a value by index if this is an Array.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|arr| arr.get(index))
    }

    /// Gets a direct member of this value by segment.
    pub fn member(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Value::Object(obj), segment) => obj.get(&segment.key()),
            (Value::Array(arr), Segment::Index(idx)) => arr.get(*idx),
            (Value::Array(arr), Segment::Field(key)) => {
                key.parse::<usize>().ok().and_then(|idx| arr.get(idx))
            }
            _ => None,
        }
    }

    fn member_mut(&mut self, segment: &Segment) -> Option<&mut Value> {
        match (self, segment) {
            (Value::Object(obj), segment) => obj.get_mut(&segment.key()),
            (Value::Array(arr), Segment::Index(idx)) => arr.get_mut(*idx),
            (Value::Array(arr), Segment::Field(key)) => {
                key.parse::<usize>().ok().and_then(move |idx| arr.get_mut(idx))
            }
            _ => None,
        }
    }

    /// Returns the members of an array or object in enumeration order.
    ///
    /// Arrays yield their indices, objects their keys; scalars have no members.
    pub fn members(&self) -> Vec<(Segment, &Value)> {
        match self {
            Value::Array(arr) => arr
                .iter()
                .enumerate()
                .map(|(idx, v)| (Segment::Index(idx), v))
                .collect(),
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| (Segment::Field(k.to_string()), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolves a path below this value.
    ///
    /// Returns `None` as soon as a segment is absent.
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = current.member(segment)?;
        }
        Some(current)
    }

    /// Writes `value` at `path` and returns the value it replaced.
    ///
    /// A missing final key of an object is created (the replaced value is
    /// then `Null`), and an array may grow by exactly one element. Every
    /// intermediate segment must already exist.
    pub fn set_path(&mut self, path: &Path, value: Value) -> Result<Value> {
        let Some((last, parents)) = path.segments().split_last() else {
            return Ok(core::mem::replace(self, value));
        };

        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            current = match current.member_mut(segment) {
                Some(next) => next,
                None => return Err(Error::path_not_found(path.prefix(depth + 1).to_string())),
            };
        }

        match current {
            Value::Object(obj) => Ok(obj.insert(last.key(), value).unwrap_or(Value::Null)),
            Value::Array(arr) => {
                let idx = match last {
                    Segment::Index(idx) => Some(*idx),
                    Segment::Field(key) => key.parse::<usize>().ok(),
                };
                match idx {
                    Some(idx) if idx < arr.len() => Ok(core::mem::replace(&mut arr[idx], value)),
                    Some(idx) if idx == arr.len() => {
                        arr.push(value);
                        Ok(Value::Null)
                    }
                    _ => Err(Error::path_not_found(path.to_string())),
                }
            }
            other => Err(Error::not_assignable(
                path.to_string(),
                format!("cannot set a member on {}", other.type_name()),
            )),
        }
    }

    /// Returns a short name for the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Renders the value as surface text.
    ///
    /// `Null` renders as the empty string, strings render unquoted, and
    /// containers render as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n % 1.0 == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else if n.is_finite() {
        write!(f, "{}", n)
    } else {
        f.write_str("null")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Formats the value as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => write_quoted(f, s),
            Value::Array(arr) => {
                f.write_str("[")?;
                for (idx, item) in arr.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                f.write_str("{")?;
                for (idx, (key, item)) in obj.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{}", item)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Less),
            (_, Value::Null) => Some(Ordering::Greater),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

// From implementations for convenient construction
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn user_data() -> Value {
        let mut user = Object::new();
        user.insert("username", Value::from("Username"));

        let mut root = Object::new();
        root.insert("user", Value::Object(user));
        root.insert(
            "fruits",
            Value::Array(vec!["Apple".into(), "Orange".into(), "Pineapple".into()]),
        );
        Value::Object(root)
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut obj = Object::new();
        obj.insert("z", Value::from(1));
        obj.insert("a", Value::from(2));
        obj.insert("m", Value::from(3));

        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_object_insert_existing_keeps_position() {
        let mut obj = Object::new();
        obj.insert("a", Value::from(1));
        obj.insert("b", Value::from(2));

        let replaced = obj.insert("a", Value::from(3));
        assert_eq!(replaced, Some(Value::from(1)));

        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_object_remove() {
        let mut obj = Object::new();
        obj.insert("key", Value::from(42));

        assert!(obj.contains_key("key"));
        assert_eq!(obj.remove("key"), Some(Value::from(42)));
        assert!(!obj.contains_key("key"));
    }

    #[test]
    fn test_members_enumeration() {
        let data = user_data();
        let members = data.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].0, Segment::Field("user".into()));
        assert_eq!(members[1].0, Segment::Field("fruits".into()));

        let fruits = data.get("fruits");
        let fruit_members = fruits.map(|f| f.members()).unwrap_or_default();
        assert_eq!(fruit_members[2].0, Segment::Index(2));
        assert!(Value::from(3).members().is_empty());
    }

    #[test]
    fn test_get_path() {
        let data = user_data();
        let path = Path::from(vec![Segment::Field("user".into()), Segment::Field("username".into())]);
        assert_eq!(data.get_path(&path), Some(&Value::from("Username")));

        let path = Path::from(vec![Segment::Field("fruits".into()), Segment::Index(1)]);
        assert_eq!(data.get_path(&path), Some(&Value::from("Orange")));

        let path = Path::from(vec![Segment::Field("missing".into()), Segment::Field("x".into())]);
        assert_eq!(data.get_path(&path), None);
    }

    #[test]
    fn test_set_path_replaces_and_returns_old() {
        let mut data = user_data();
        let path = Path::from(vec![Segment::Field("user".into()), Segment::Field("username".into())]);

        let old = data.set_path(&path, Value::from("Alice")).unwrap();
        assert_eq!(old, Value::from("Username"));
        assert_eq!(data.get_path(&path), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_set_path_creates_missing_key() {
        let mut data = user_data();
        let path = Path::from(vec![Segment::Field("user".into()), Segment::Field("email".into())]);

        let old = data.set_path(&path, Value::from("a@b.c")).unwrap();
        assert!(old.is_null());
        assert_eq!(data.get_path(&path), Some(&Value::from("a@b.c")));
    }

    #[test]
    fn test_set_path_array_bounds() {
        let mut data = user_data();
        let push = Path::from(vec![Segment::Field("fruits".into()), Segment::Index(3)]);
        assert!(data.set_path(&push, Value::from("Kiwi")).is_ok());
        assert_eq!(data.get("fruits").and_then(|f| f.as_array()).map(|a| a.len()), Some(4));

        let gap = Path::from(vec![Segment::Field("fruits".into()), Segment::Index(9)]);
        assert!(data.set_path(&gap, Value::from("Fig")).is_err());
    }

    #[test]
    fn test_set_path_missing_intermediate() {
        let mut data = user_data();
        let path = Path::from(vec![Segment::Field("profile".into()), Segment::Field("age".into())]);
        let err = data.set_path(&path, Value::from(3)).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { .. }));
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::from("hi").render(), "hi");
        assert_eq!(Value::from(3).render(), "3");
        assert_eq!(Value::from(2.5).render(), "2.5");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(
            Value::Array(vec![Value::from(1), Value::from("a")]).render(),
            "[1,\"a\"]"
        );
    }

    #[test]
    fn test_display_object_in_order() {
        let data = user_data();
        assert_eq!(
            data.to_string(),
            "{\"user\":{\"username\":\"Username\"},\"fruits\":[\"Apple\",\"Orange\",\"Pineapple\"]}"
        );
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::from(42), Value::Number(42.0));
        assert_ne!(Value::from(true), Value::from(false));
        assert_ne!(Value::from("1"), Value::from(1));
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::from(1) < Value::from(2));
        assert!(Value::from("a") < Value::from("b"));
    }

    #[test]
    fn test_value_from_option() {
        let v: Value = None::<i32>.into();
        assert!(v.is_null());
        let v: Value = Some("x").into();
        assert_eq!(v.as_str(), Some("x"));
    }
}
