//! User database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Role, UserProfile};

impl Database {
    /// Insert a new user.
    pub fn insert_user(&self, user: &UserProfile) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO users (user_id, name, email, role) VALUES (?1, ?2, ?3, ?4)",
            params![user.user_id, user.name, user.email, user.role.as_str()],
        )?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: &str) -> DbResult<Option<UserProfile>> {
        self.conn
            .query_row(
                "SELECT user_id, name, email, role FROM users WHERE user_id = ?",
                [user_id],
                map_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a user by email (case-insensitive).
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<UserProfile>> {
        self.conn
            .query_row(
                "SELECT user_id, name, email, role FROM users WHERE email = ?",
                [email.trim()],
                map_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    user_id: String,
    name: String,
    email: String,
    role: String,
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
    })
}

impl TryFrom<UserRow> for UserProfile {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: row.role.parse::<Role>().map_err(DbError::Constraint)?,
        })
    }
}
