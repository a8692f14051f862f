use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use rusqlite::{Connection, Statement};

use crate::convert::DatabaseValue;
use crate::error::Result;
use crate::row::Row;
use crate::value::Value;

/// Outcome a transaction closure returns to decide how the transaction ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Commit,
    Rollback,
}

/// Serialized access to a single SQLite connection.
///
/// All statements go through one mutex-guarded connection, so statements
/// never interleave across threads. Clones share the same connection.
#[derive(Clone)]
pub struct DatabaseQueue {
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseQueue {
    /// Open (creating if necessary) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening sqlite database at {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("sqlite connection lock poisoned")
    }

    /// Execute a statement, binding `params` in order at 1-based positions.
    ///
    /// Returns the number of rows changed.
    pub fn execute(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<usize> {
        let conn = self.lock();
        Database::new(&conn).execute(sql, params)
    }

    /// Run every row of a query through materialization.
    pub fn fetch_rows(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<Vec<Row>> {
        let conn = self.lock();
        Database::new(&conn).fetch_rows(sql, params)
    }

    /// First row of a query, if any.
    pub fn fetch_one_row(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<Option<Row>> {
        let conn = self.lock();
        Database::new(&conn).fetch_one_row(sql, params)
    }

    /// First column of the first row, through a [`DatabaseValue`] adapter.
    pub fn fetch_one<T: DatabaseValue>(
        &self,
        sql: &str,
        params: &[&dyn DatabaseValue],
    ) -> Result<Option<T>> {
        let conn = self.lock();
        Database::new(&conn).fetch_one(sql, params)
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits or rolls back according to the value `f`
    /// returns. If `f` errors, the transaction rolls back and the error is
    /// propagated.
    pub fn in_transaction<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&Database<'_>) -> Result<Transaction>,
    {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        // A drop without commit rolls back, which covers the error path.
        match f(&Database::new(&tx))? {
            Transaction::Commit => tx.commit()?,
            Transaction::Rollback => tx.rollback()?,
        }
        Ok(())
    }
}

/// Borrowed handle onto the live connection, as seen by transaction and
/// migration closures.
pub struct Database<'a> {
    conn: &'a Connection,
}

impl<'a> Database<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Execute a batch of semicolon-separated statements with no parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn execute(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        bind_params(&mut stmt, params)?;
        Ok(stmt.raw_execute()?)
    }

    pub fn fetch_rows(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        bind_params(&mut stmt, params)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut rows = stmt.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(Value::from(row.get_ref(index)?));
            }
            out.push(Row::new(columns.clone(), values));
        }
        Ok(out)
    }

    pub fn fetch_one_row(&self, sql: &str, params: &[&dyn DatabaseValue]) -> Result<Option<Row>> {
        Ok(self.fetch_rows(sql, params)?.into_iter().next())
    }

    /// First column of the first row, through a [`DatabaseValue`] adapter.
    ///
    /// `None` both when the query returns no row and when the adapter
    /// declines the stored variant.
    pub fn fetch_one<T: DatabaseValue>(
        &self,
        sql: &str,
        params: &[&dyn DatabaseValue],
    ) -> Result<Option<T>> {
        Ok(self
            .fetch_one_row(sql, params)?
            .and_then(|row| row.value_at(0)))
    }
}

fn bind_params(stmt: &mut Statement<'_>, params: &[&dyn DatabaseValue]) -> Result<()> {
    for (position, param) in params.iter().enumerate() {
        param.bind(stmt, position + 1)?;
    }
    Ok(())
}
