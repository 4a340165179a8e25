//! Runtime values carried by data edges
//!
//! Ports, fields and the output cache all hold [`Value`]. Node bodies read
//! them back as concrete Rust types through [`FromValue`]; a read with the
//! wrong type is a type mismatch, never a silent conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptEngineError};

/// A dynamically typed value flowing through the graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// Ordered collection of values
    List(Vec<Value>),
}

impl Value {
    /// Runtime type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::List(_) => ValueType::List,
        }
    }

    /// Extract a typed value, failing with a type mismatch
    pub fn get<T: FromValue>(&self) -> Result<T> {
        T::from_value(self).ok_or(ScriptEngineError::TypeMismatch {
            expected: T::TYPE_NAME,
            found: self.value_type(),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Type tag of a value, also used to declare data port types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Accepts any value (port declarations only)
    Any,
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
}

impl ValueType {
    /// Whether a value of type `other` satisfies a port declared as `self`
    pub fn accepts(&self, other: ValueType) -> bool {
        matches!(self, ValueType::Any) || *self == other
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed extraction from a [`Value`]
pub trait FromValue: Sized {
    /// Name reported in type mismatch errors
    const TYPE_NAME: &'static str;

    /// Returns `None` when the value has a different runtime type
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<Value> {
    const TYPE_NAME: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_extraction() {
        assert_eq!(Value::Int(12).get::<i64>().unwrap(), 12);
        assert!(Value::Bool(true).get::<bool>().unwrap());
        assert_eq!(Value::from("hi").get::<String>().unwrap(), "hi");
        assert_eq!(Value::Int(3).get::<Value>().unwrap(), Value::Int(3));
    }

    #[test]
    fn test_type_mismatch() {
        let err = Value::Int(12).get::<String>().unwrap_err();
        match err {
            ScriptEngineError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "string");
                assert_eq!(found, ValueType::Int);
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }

        // No numeric coercion
        assert!(Value::Int(1).get::<f64>().is_err());
    }

    #[test]
    fn test_value_type_accepts() {
        assert!(ValueType::Any.accepts(ValueType::String));
        assert!(ValueType::Int.accepts(ValueType::Int));
        assert!(!ValueType::Int.accepts(ValueType::Float));
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::Int(1), Value::from("a"), Value::Null]);
        assert_eq!(list.to_string(), "[1, a, null]");
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_value(Value::Int(12)).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["value"], 12);
    }
}
