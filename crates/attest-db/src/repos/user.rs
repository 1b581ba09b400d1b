//! User repository.
//!
//! Users are created by the account system upstream; this service only needs
//! to store them and resolve callers.

use chrono::Utc;

use attest_core::entities::User;
use attest_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};
use crate::service::AttestService;

const SELECT_COLS: &str = "id, email, password_hash, organization, is_admin, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        organization: get_opt_string(row, 3)?,
        is_admin: row.get::<i64>(4)? != 0,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl AttestService {
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        organization: Option<&str>,
        is_admin: bool,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, organization, is_admin, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    email,
                    password_hash,
                    organization,
                    i64::from(is_admin),
                    format_datetime(&now)
                ],
            )
            .await?;

        tracing::info!(user_id = %id, "created user");

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            organization: organization.map(String::from),
            is_admin,
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// Look up a user, mapping a missing row to `None`.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        match self.get_user(id).await {
            Ok(user) => Ok(Some(user)),
            Err(DatabaseError::NoResult) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
