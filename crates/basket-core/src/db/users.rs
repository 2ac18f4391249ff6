//! User account operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, Database};
use crate::auth::hash_password;
use crate::error::{Error, Result};
use crate::models::User;

/// Demo account created by `basket seed` / `serve --demo-user`
pub const DEMO_USERNAME: &str = "test";
pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "test123";

const USER_COLUMNS: &str = "id, username, email, password, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create a user with an already hashed password
    ///
    /// A taken username or email is [`Error::AlreadyExists`].
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?)",
            params![username, email, password_hash],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return Error::AlreadyExists(format!("user '{}' or '{}'", username, email));
                }
            }
            Error::Database(e)
        })?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found after insert", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Find a user by username or email
    pub fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!(
                    "SELECT {} FROM users WHERE username = ?1 OR email = ?1 ORDER BY id LIMIT 1",
                    USER_COLUMNS
                ),
                params![login],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Whether the username or the email is already taken
    pub fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ? OR email = ?",
            params![username, email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Create the demo user unless it already exists
    ///
    /// Returns true if the user was created.
    pub fn ensure_demo_user(&self) -> Result<bool> {
        if self.user_exists(DEMO_USERNAME, DEMO_EMAIL)? {
            info!(username = DEMO_USERNAME, "Demo user already exists");
            return Ok(false);
        }

        let hash = hash_password(DEMO_PASSWORD)?;
        let user = self.create_user(DEMO_USERNAME, DEMO_EMAIL, &hash)?;
        info!(username = DEMO_USERNAME, id = user.id, "Demo user created");
        Ok(true)
    }
}
