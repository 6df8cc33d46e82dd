use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info, warn};
use rusqlite::types::{FromSql, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Params};

use crate::error::{Error, Result};

/// How long SQLite waits on a locked database file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a [`Database`] connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory => ":memory:".to_string(),
        }
    }
}

/// One result row addressed by column name. Columns keep the order of the
/// `SELECT` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    /// Raw value of a column, if the query produced it.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Convert a column into any type rusqlite knows how to read.
    pub fn get<T: FromSql>(&self, column: &str) -> Result<T> {
        let value = self
            .value(column)
            .ok_or_else(|| Error::InvalidData(format!("missing column `{column}`")))?;
        T::column_result(ValueRef::from(value))
            .map_err(|err| Error::InvalidData(format!("column `{column}`: {err}")))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

/// A statement queued for [`Database::execute_transaction`].
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement that binds nothing, e.g. DDL.
    pub fn plain(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Owner of the application's single SQLite connection.
///
/// Repositories borrow a `&Database`, so the borrow checker guarantees the
/// connection outlives every repository built on it and that nobody
/// disconnects it while a repository is alive. Every statement goes through
/// one of the `execute_*` methods, which bind parameters positionally and
/// wrap failures with the name of the operation that issued them.
#[derive(Debug)]
pub struct Database {
    location: DbLocation,
    conn: Option<Connection>,
}

impl Database {
    /// Record the target without opening it. Call [`Database::connect`] next.
    pub fn new(location: DbLocation) -> Self {
        Self {
            location,
            conn: None,
        }
    }

    /// Open a file-backed database in one step.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut db = Self::new(DbLocation::File(path.as_ref().to_path_buf()));
        db.connect()?;
        Ok(db)
    }

    /// Fresh private in-memory database, already connected.
    pub fn in_memory() -> Result<Self> {
        let mut db = Self::new(DbLocation::Memory);
        db.connect()?;
        Ok(db)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection and turn on `PRAGMA foreign_keys` so the cascades in
    /// the schema actually fire. Calling this while connected keeps the
    /// existing handle.
    pub fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            debug!("connect: already connected to {}", self.location.describe());
            return Ok(());
        }

        let opened = match &self.location {
            DbLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Connection::open(path)
            }
            DbLocation::Memory => Connection::open_in_memory(),
        };
        let conn = opened.map_err(|err| log_failure("connect", err))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| log_failure("enable foreign keys", err))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|err| log_failure("set busy timeout", err))?;

        info!("database connection established: {}", self.location.describe());
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the connection. A no-op when already closed.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            debug!("disconnect: not connected");
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("database connection closed: {}", self.location.describe());
                Ok(())
            }
            Err((conn, err)) => {
                self.conn = Some(conn);
                Err(log_failure("disconnect", err))
            }
        }
    }

    /// Run a read statement and collect every row.
    pub fn execute_query<P: Params>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
    ) -> Result<Vec<Record>> {
        let conn = self.connection()?;
        let records =
            collect_records(conn, sql, params).map_err(|err| log_failure(operation, err))?;
        debug!("{operation}: {} row(s)", records.len());
        Ok(records)
    }

    /// Run a read statement that yields exactly one scalar, such as `COUNT(*)`
    /// or `COALESCE(SUM(..), 0)`.
    pub fn query_scalar<T: FromSql, P: Params>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
    ) -> Result<T> {
        let conn = self.connection()?;
        conn.query_row(sql, params, |row| row.get(0))
            .map_err(|err| log_failure(operation, err))
    }

    /// Run an INSERT, UPDATE, or DELETE and return the affected row count. The
    /// connection is in autocommit mode, so success means committed.
    pub fn execute_update<P: Params>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
    ) -> Result<usize> {
        let conn = self.connection()?;
        let affected = conn
            .execute(sql, params)
            .map_err(|err| log_failure(operation, err))?;
        debug!("{operation}: {affected} row(s) affected");
        Ok(affected)
    }

    /// Rowid of the most recent successful INSERT on this connection.
    pub fn last_insert_rowid(&self) -> Result<i64> {
        Ok(self.connection()?.last_insert_rowid())
    }

    /// Run every statement inside one transaction. Either all of them commit
    /// or none do; the first failure is returned as-is after the rollback.
    /// Returns the affected row count of each statement, in order.
    pub fn execute_transaction(
        &self,
        operation: &'static str,
        statements: &[Statement],
    ) -> Result<Vec<usize>> {
        let conn = self.connection()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|err| log_failure(operation, err))?;

        let mut counts = Vec::with_capacity(statements.len());
        for statement in statements {
            match tx.execute(&statement.sql, params_from_iter(statement.params.iter())) {
                Ok(affected) => counts.push(affected),
                Err(err) => {
                    // Dropping `tx` rolls back.
                    warn!("{operation}: rolling back after {} statement(s)", counts.len());
                    return Err(log_failure(operation, err));
                }
            }
        }

        tx.commit().map_err(|err| log_failure(operation, err))?;
        debug!("{operation}: committed {} statement(s)", counts.len());
        Ok(counts)
    }

    /// Run `work` inside one transaction on this connection. Every statement
    /// it issues through this `Database`, including those from repositories
    /// borrowing it, commits together when `work` returns `Ok` and rolls back
    /// otherwise. Must not be nested with itself or with
    /// [`Database::execute_transaction`].
    pub fn run_in_transaction<T>(
        &self,
        operation: &'static str,
        work: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let tx = self
            .connection()?
            .unchecked_transaction()
            .map_err(|err| log_failure(operation, err))?;

        let value = work().inspect_err(|err| {
            warn!("{operation}: rolling back after {err}");
        })?;

        tx.commit().map_err(|err| log_failure(operation, err))?;
        debug!("{operation}: committed");
        Ok(value)
    }

    /// Run a script of statements that bind nothing.
    pub fn execute_batch(&self, operation: &'static str, sql: &str) -> Result<()> {
        self.connection()?
            .execute_batch(sql)
            .map_err(|err| log_failure(operation, err))
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotConnected)
    }
}

fn collect_records<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<Record>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut columns = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            columns.push((name.clone(), row.get::<_, Value>(idx)?));
        }
        records.push(Record { columns });
    }
    Ok(records)
}

/// Wrap and log a rusqlite error. Constraint violations are expected during
/// normal use (duplicate usernames), so they log at `warn`.
fn log_failure(operation: &'static str, err: rusqlite::Error) -> Error {
    let wrapped = Error::storage(operation, err);
    if wrapped.is_constraint_violation() {
        warn!("{wrapped}");
    } else {
        error!("{wrapped}");
    }
    wrapped
}
