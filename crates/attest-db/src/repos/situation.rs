//! Situation repository.

use chrono::Utc;

use attest_core::entities::Situation;
use attest_core::enums::SituationStatus;
use attest_core::ids::PREFIX_SITUATION;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, parse_datetime, parse_enum, parse_json, to_json_text,
};
use crate::service::AttestService;

const SELECT_COLS: &str = "id, status, user_id, payload, created_at, updated_at";

fn row_to_situation(row: &libsql::Row) -> Result<Situation, DatabaseError> {
    Ok(Situation {
        id: row.get(0)?,
        status: parse_enum(&row.get::<String>(1)?)?,
        user_id: get_opt_string(row, 2)?,
        payload: parse_json(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl AttestService {
    pub async fn create_situation(
        &self,
        user_id: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<Situation, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SITUATION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO situations (id, status, user_id, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    SituationStatus::Draft.as_str(),
                    user_id,
                    to_json_text(payload)?,
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        Ok(Situation {
            id,
            status: SituationStatus::Draft,
            user_id: user_id.map(String::from),
            payload: payload.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_situation(&self, id: &str) -> Result<Situation, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM situations WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_situation(&row)
    }

    /// Look up a situation, mapping a missing row to `None`.
    pub async fn find_situation(&self, id: &str) -> Result<Option<Situation>, DatabaseError> {
        match self.get_situation(id).await {
            Ok(situation) => Ok(Some(situation)),
            Err(DatabaseError::NoResult) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn set_situation_status(
        &self,
        id: &str,
        status: SituationStatus,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE situations SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), format_datetime(&Utc::now()), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(situation_id = id, %status, "situation status changed");
        Ok(())
    }
}
