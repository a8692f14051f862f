use crate::convert::DatabaseValue;
use crate::value::Value;

/// A materialized result row, detached from any statement lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Column names, in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw primitive at a 0-based column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Extract the value at a 0-based column index through a
    /// [`DatabaseValue`] adapter.
    ///
    /// Returns `None` when the index is out of range or the adapter
    /// declines the stored variant.
    pub fn value_at<T: DatabaseValue>(&self, index: usize) -> Option<T> {
        self.values.get(index).and_then(T::from_value)
    }

    /// Like [`Row::value_at`], addressed by column name.
    pub fn value_named<T: DatabaseValue>(&self, name: &str) -> Option<T> {
        let index = self.columns.iter().position(|c| c == name)?;
        self.value_at(index)
    }
}
