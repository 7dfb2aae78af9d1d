//! Repository for the `page_headers` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use showcase_core::site::PageHeaderRecord;

use crate::models::PageHeaderRow;

/// Column list for `page_headers` queries.
const COLUMNS: &str = "page, i18n, hero, updated_at, updated_by, history";

pub struct PageHeaderRepo;

impl PageHeaderRepo {
    pub async fn find_by_page(
        pool: &PgPool,
        page: &str,
    ) -> Result<Option<PageHeaderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_headers WHERE page = $1");
        sqlx::query_as::<_, PageHeaderRow>(&query)
            .bind(page)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_update(
        conn: &mut PgConnection,
        page: &str,
    ) -> Result<Option<PageHeaderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_headers WHERE page = $1 FOR UPDATE");
        sqlx::query_as::<_, PageHeaderRow>(&query)
            .bind(page)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Insert or overwrite the header for `record.page`.
    pub async fn upsert(
        conn: &mut PgConnection,
        record: &PageHeaderRecord,
    ) -> Result<PageHeaderRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_headers ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (page) DO UPDATE SET \
                i18n = EXCLUDED.i18n, hero = EXCLUDED.hero, \
                updated_at = EXCLUDED.updated_at, updated_by = EXCLUDED.updated_by, \
                history = EXCLUDED.history \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageHeaderRow>(&query)
            .bind(&record.page)
            .bind(Json(&record.fields.i18n))
            .bind(record.fields.hero.as_ref().map(Json))
            .bind(record.updated_at)
            .bind(&record.updated_by)
            .bind(Json(&record.history))
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<PageHeaderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_headers ORDER BY page");
        sqlx::query_as::<_, PageHeaderRow>(&query)
            .fetch_all(pool)
            .await
    }
}
