use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::params;
use uuid::Uuid;

use super::connection::{Database, Record};
use crate::error::{Error, Result};
use crate::models::Validate;

/// CRUD contract shared by the song, user, and playlist repositories.
///
/// Reads return `None`/`false` for missing rows instead of an error; only
/// validation and storage failures surface as `Err`.
pub trait Repository {
    type Entity: Validate;

    /// Insert a new row and return its identifier. Validation runs first, so a
    /// rejected entity never touches the database.
    fn create(&self, entity: &Self::Entity) -> Result<Uuid>;

    fn read_by_id(&self, id: Uuid) -> Result<Option<Self::Entity>>;

    /// Every row, most recently created first.
    fn read_all(&self) -> Result<Vec<Self::Entity>>;

    /// Overwrite the editable fields of an existing row. `Ok(false)` when the
    /// id is unknown.
    fn update(&self, entity: &Self::Entity) -> Result<bool>;

    fn exists(&self, id: Uuid) -> Result<bool>;

    /// `Ok(true)` if a row was removed. Dependent rows go with it through the
    /// schema's cascades.
    fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Run `Validate` and log rejections with the operation that attempted them.
pub(crate) fn validate_for<E: Validate>(operation: &'static str, entity: &E) -> Result<()> {
    entity.validate().inspect_err(|err| {
        warn!("{operation} rejected: {err}");
    })
}

/// `table` must be one of the schema's constant table names; it is spliced
/// into the SQL, the id is bound.
pub(crate) fn exists_in(db: &Database, table: &'static str, id: Uuid) -> Result<bool> {
    let count: i64 = db.query_scalar(
        "check existence",
        &format!("SELECT COUNT(*) FROM {table} WHERE id = ?1"),
        params![id.to_string()],
    )?;
    Ok(count > 0)
}

pub(crate) fn delete_from(db: &Database, table: &'static str, id: Uuid) -> Result<bool> {
    let deleted = db.execute_update(
        "delete row",
        &format!("DELETE FROM {table} WHERE id = ?1"),
        params![id.to_string()],
    )?;

    if deleted == 0 {
        warn!("nothing to delete in {table}: {id}");
        Ok(false)
    } else {
        info!("deleted from {table}: {id}");
        Ok(true)
    }
}

pub(crate) fn uuid_column(record: &Record, column: &str) -> Result<Uuid> {
    let text: String = record.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| Error::InvalidData(format!("invalid uuid `{text}` in column `{column}`")))
}

pub(crate) fn timestamp_column(record: &Record, column: &str) -> Result<DateTime<Utc>> {
    record.get(column)
}
