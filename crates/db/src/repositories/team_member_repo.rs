//! Repository for the `team_members` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use showcase_core::site::TeamMemberRecord;

use crate::models::TeamMemberRow;

/// Column list for `team_members` queries.
const COLUMNS: &str = "\
    id, name, sort_order, i18n, photo, deleted, \
    created_at, updated_at, updated_by, history";

pub struct TeamMemberRepo;

impl TeamMemberRepo {
    pub async fn insert(
        conn: &mut PgConnection,
        record: &TeamMemberRecord,
    ) -> Result<TeamMemberRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let fields = &record.fields;
        sqlx::query_as::<_, TeamMemberRow>(&query)
            .bind(&record.id)
            .bind(&fields.name)
            .bind(fields.order)
            .bind(Json(&fields.i18n))
            .bind(fields.photo.as_ref().map(Json))
            .bind(record.deleted)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(&record.updated_by)
            .bind(Json(&record.history))
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<TeamMemberRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM team_members WHERE id = $1");
        sqlx::query_as::<_, TeamMemberRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: &str,
    ) -> Result<Option<TeamMemberRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM team_members WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TeamMemberRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn update(
        conn: &mut PgConnection,
        record: &TeamMemberRecord,
    ) -> Result<TeamMemberRow, sqlx::Error> {
        let query = format!(
            "UPDATE team_members SET \
                name = $2, sort_order = $3, i18n = $4, photo = $5, deleted = $6, \
                updated_at = $7, updated_by = $8, history = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let fields = &record.fields;
        sqlx::query_as::<_, TeamMemberRow>(&query)
            .bind(&record.id)
            .bind(&fields.name)
            .bind(fields.order)
            .bind(Json(&fields.i18n))
            .bind(fields.photo.as_ref().map(Json))
            .bind(record.deleted)
            .bind(record.updated_at)
            .bind(&record.updated_by)
            .bind(Json(&record.history))
            .fetch_one(&mut *conn)
            .await
    }

    /// Members in display order.
    pub async fn list(
        pool: &PgPool,
        include_deleted: bool,
    ) -> Result<Vec<TeamMemberRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members \
             WHERE $1 OR NOT deleted \
             ORDER BY sort_order ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, TeamMemberRow>(&query)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }
}
