//! User repository.
//!
//! The first user ever created is an admin and needs no actor. After that
//! only admins create users.

use chrono::Utc;
use serde_json::json;
use swatch_core::entities::User;
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_USER;

use crate::constraints::is_unique_violation;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, required_name};
use crate::service::SwatchService;

const SELECT_COLS: &str = "id, username, is_admin, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        username: row.get::<String>(1)?,
        is_admin: row.get::<i64>(2)? != 0,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl SwatchService {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` when users already exist and `actor` is missing or
    /// not an admin; `InvalidState` when the username is taken.
    pub async fn create_user(
        &self,
        actor: Option<&Actor>,
        username: &str,
        is_admin: bool,
    ) -> Result<User, DatabaseError> {
        let username = required_name(username, "Username")?;
        let first = self.count_users().await? == 0;
        if !first && !actor.is_some_and(|a| a.is_admin) {
            return Err(DatabaseError::PermissionDenied(
                "only admins can create users".into(),
            ));
        }
        let is_admin = is_admin || first;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    username.as_str(),
                    i64::from(is_admin),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DatabaseError::InvalidState(format!("Username \"{username}\" is already taken"))
                } else {
                    e.into()
                }
            })?;

        let user = User {
            id: id.clone(),
            username,
            is_admin,
            created_at: now,
            updated_at: now,
        };

        self.record(
            actor,
            EntityType::User,
            &id,
            AuditAction::Created,
            Some(json!({ "username": user.username, "is_admin": is_admin })),
        )
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))?;
        row_to_user(&row)
    }

    /// Case-insensitive username lookup.
    pub async fn find_user_by_name(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE username = ?1"),
                [username.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY username LIMIT {limit}"),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    pub async fn count_users(&self) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
