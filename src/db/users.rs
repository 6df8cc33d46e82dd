use log::{debug, info};
use rusqlite::params;
use uuid::Uuid;

use super::connection::{Database, Record};
use super::repository::{
    delete_from, exists_in, timestamp_column, uuid_column, validate_for, Repository,
};
use crate::error::Result;
use crate::models::User;

const TABLE: &str = "users";

const USER_COLUMNS: &str = "id, username, email, created_at";

/// User accounts. Username and email are each unique; a clash on either
/// surfaces as a constraint error from SQLite.
pub struct UserRepository<'db> {
    db: &'db Database,
}

impl<'db> UserRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    pub fn read_by_username(&self, username: &str) -> Result<Option<User>> {
        self.read_one("read user by username", "username = ?1", username)
    }

    pub fn read_by_email(&self, email: &str) -> Result<Option<User>> {
        self.read_one("read user by email", "email = ?1", email)
    }

    fn read_one(&self, operation: &'static str, condition: &str, arg: &str) -> Result<Option<User>> {
        let records = self.db.execute_query(
            operation,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {condition}"),
            params![arg],
        )?;

        match records.first() {
            Some(record) => user_from_record(record).map(Some),
            None => {
                debug!("{operation}: no match for {arg}");
                Ok(None)
            }
        }
    }
}

impl Repository for UserRepository<'_> {
    type Entity = User;

    fn create(&self, user: &User) -> Result<Uuid> {
        validate_for("create user", user)?;

        self.db.execute_update(
            "create user",
            "INSERT INTO users (id, username, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id.to_string(), user.username, user.email, user.created_at],
        )?;

        info!("user created: {} - {} ({})", user.id, user.username, user.email);
        Ok(user.id)
    }

    fn read_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.read_one("read user", "id = ?1", &id.to_string())
    }

    fn read_all(&self) -> Result<Vec<User>> {
        self.db
            .execute_query(
                "read all users",
                &format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC"),
                [],
            )?
            .iter()
            .map(user_from_record)
            .collect()
    }

    fn update(&self, user: &User) -> Result<bool> {
        validate_for("update user", user)?;

        let updated = self.db.execute_update(
            "update user",
            "UPDATE users SET username = ?1, email = ?2 WHERE id = ?3",
            params![user.username, user.email, user.id.to_string()],
        )?;

        if updated > 0 {
            info!("user updated: {}", user.id);
        }
        Ok(updated > 0)
    }

    fn exists(&self, id: Uuid) -> Result<bool> {
        exists_in(self.db, TABLE, id)
    }

    /// Removing a user also removes every playlist they own.
    fn delete(&self, id: Uuid) -> Result<bool> {
        delete_from(self.db, TABLE, id)
    }
}

fn user_from_record(record: &Record) -> Result<User> {
    Ok(User {
        id: uuid_column(record, "id")?,
        username: record.get("username")?,
        email: record.get("email")?,
        created_at: timestamp_column(record, "created_at")?,
    })
}
