use std::sync::Arc;

use indexmap::IndexMap;

use super::Value;
use crate::error::{OpgraphError, Result};

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Arc::new(items))
    }

    pub fn pair(first: Value, second: Value) -> Value {
        Value::Tuple(Arc::new(vec![first, second]))
    }

    pub fn dict(map: IndexMap<Value, Value>) -> Value {
        Value::Dict(Arc::new(map))
    }

    /// Half-open integer range as a list, `[start, end)`.
    pub fn range(start: i64, end: i64) -> Value {
        Value::list((start..end).map(Value::Int).collect())
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(OpgraphError::type_error("bool", self.type_name())),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            _ => Err(OpgraphError::type_error("int", self.type_name())),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            _ => Err(OpgraphError::type_error("float", self.type_name())),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_ref()),
            _ => Err(OpgraphError::type_error("string", self.type_name())),
        }
    }

    /// Elements of a tuple or list, borrowed.
    pub fn as_slice(&self) -> Result<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Ok(items.as_slice()),
            _ => Err(OpgraphError::type_error("tuple", self.type_name())),
        }
    }

    pub fn as_pair(&self) -> Result<(&Value, &Value)> {
        match self.as_slice()? {
            [first, second] => Ok((first, second)),
            items => Err(OpgraphError::value_error(format!(
                "expected a pair, got {} elements",
                items.len()
            ))),
        }
    }

    pub fn as_dict(&self) -> Result<&IndexMap<Value, Value>> {
        match self {
            Value::Dict(d) => Ok(d.as_ref()),
            _ => Err(OpgraphError::type_error("dict", self.type_name())),
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

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::new(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::new(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<IndexMap<Value, Value>> for Value {
    fn from(map: IndexMap<Value, Value>) -> Self {
        Value::dict(map)
    }
}
