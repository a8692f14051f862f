use rusqlite::Statement;

use crate::value::Value;

/// Two-way conversion between an application type and a primitive [`Value`].
///
/// Implementing this trait lets a type be bound as a statement parameter and
/// extracted from result rows as if it were a native SQLite scalar.
///
/// `to_value` is total: every instance serializes to exactly one primitive.
/// `from_value` is partial: it returns `Some` only for the variant(s) the
/// type accepts and `None` for every other variant, `Null` included. A
/// variant mismatch on read is an ordinary missing value, never an error.
pub trait DatabaseValue {
    /// Serialize into the primitive representation stored by the engine.
    fn to_value(&self) -> Value;

    /// Reconstruct from a primitive read out of a row, if the variant matches.
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;

    /// Bind the serialized primitive at a 1-based parameter index.
    ///
    /// The engine's status is propagated untouched.
    fn bind(&self, stmt: &mut Statement<'_>, index: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(index, self.to_value())
    }
}

impl DatabaseValue for i64 {
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl DatabaseValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl DatabaseValue for bool {
    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    // SQLite convention: any non-zero integer is true.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl DatabaseValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(t) => Some(t.clone()),
            _ => None,
        }
    }
}

impl DatabaseValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }
}

/// `Option<T>` maps `None` to SQL NULL and back.
///
/// A non-NULL primitive the inner type declines still yields `None`, so a
/// stored NULL and a variant mismatch are indistinguishable here. Callers
/// that need the distinction should extract the raw [`Value`] instead.
impl<T: DatabaseValue> DatabaseValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
