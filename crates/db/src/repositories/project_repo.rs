//! Repository for the `projects` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use showcase_core::project::{ProjectQuery, ProjectRecord, ProjectSort};

use crate::models::ProjectRow;

/// Column list for `projects` queries.
const COLUMNS: &str = "\
    id, status, featured, sort_order, category, city, client, \
    i18n, media, deleted, created_at, updated_at, updated_by, history";

/// A positional parameter of the dynamic listing filter.
enum FilterArg {
    Text(String),
    Bool(bool),
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Build the `WHERE` clause for a listing query and the values to bind,
/// in placeholder order.
fn build_filter(query: &ProjectQuery) -> (String, Vec<FilterArg>) {
    let filter = &query.filter;
    let mut conditions = Vec::new();
    let mut args = Vec::new();
    let mut bind_idx = 1u32;

    if !filter.include_deleted {
        conditions.push("NOT deleted".to_string());
    }
    if let Some(status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        args.push(FilterArg::Text(status.name().to_string()));
        bind_idx += 1;
    }
    if let Some(category) = filter.category {
        conditions.push(format!("category = ${bind_idx}"));
        args.push(FilterArg::Text(category.name().to_string()));
        bind_idx += 1;
    }
    if let Some(featured) = filter.featured {
        conditions.push(format!("featured = ${bind_idx}"));
        args.push(FilterArg::Bool(featured));
        bind_idx += 1;
    }
    if let Some(term) = filter.search_term() {
        conditions.push(format!(
            "(id ILIKE ${bind_idx} OR city ILIKE ${bind_idx} OR client ILIKE ${bind_idx} \
             OR EXISTS (SELECT 1 FROM jsonb_each(i18n) AS t(locale, body) \
                        WHERE body->>'title' ILIKE ${bind_idx} \
                           OR body->>'excerpt' ILIKE ${bind_idx} \
                           OR body->>'description' ILIKE ${bind_idx}))"
        ));
        args.push(FilterArg::Text(like_pattern(&term)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, args)
}

fn order_clause(sort: ProjectSort) -> &'static str {
    match sort {
        ProjectSort::Order => "sort_order ASC, created_at ASC, id ASC",
        ProjectSort::UpdatedDesc => "updated_at DESC, id ASC",
        ProjectSort::CreatedDesc => "created_at DESC, id ASC",
    }
}

/// Provides persistence for project records.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a freshly created record. A duplicate id fails with a unique
    /// violation.
    pub async fn insert(
        conn: &mut PgConnection,
        record: &ProjectRecord,
    ) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        let fields = &record.fields;
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&record.id)
            .bind(fields.status.name())
            .bind(fields.featured)
            .bind(fields.order)
            .bind(fields.category.name())
            .bind(&fields.city)
            .bind(fields.client.as_deref())
            .bind(Json(&fields.i18n))
            .bind(Json(&fields.media))
            .bind(record.deleted)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(&record.updated_by)
            .bind(Json(&record.history))
            .fetch_one(&mut *conn)
            .await
    }

    /// Find a project by id, including soft-deleted ones.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load and lock a row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: &str,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write back every mutable column of a record.
    pub async fn update(
        conn: &mut PgConnection,
        record: &ProjectRecord,
    ) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                status = $2, featured = $3, sort_order = $4, category = $5, \
                city = $6, client = $7, i18n = $8, media = $9, deleted = $10, \
                updated_at = $11, updated_by = $12, history = $13 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let fields = &record.fields;
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&record.id)
            .bind(fields.status.name())
            .bind(fields.featured)
            .bind(fields.order)
            .bind(fields.category.name())
            .bind(&fields.city)
            .bind(fields.client.as_deref())
            .bind(Json(&fields.i18n))
            .bind(Json(&fields.media))
            .bind(record.deleted)
            .bind(record.updated_at)
            .bind(&record.updated_by)
            .bind(Json(&record.history))
            .fetch_one(&mut *conn)
            .await
    }

    /// One page of matching rows plus the total match count.
    pub async fn list(
        pool: &PgPool,
        query: &ProjectQuery,
    ) -> Result<(Vec<ProjectRow>, i64), sqlx::Error> {
        let (where_clause, args) = build_filter(query);

        let count_sql = format!("SELECT COUNT(*) FROM projects {where_clause}");
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count = match arg {
                FilterArg::Text(value) => count.bind(value),
                FilterArg::Bool(value) => count.bind(*value),
            };
        }
        let total = count.fetch_one(pool).await?;

        let next_idx = args.len() + 1;
        let page_sql = format!(
            "SELECT {COLUMNS} FROM projects {where_clause} \
             ORDER BY {order} \
             LIMIT ${next_idx} OFFSET ${offset_idx}",
            order = order_clause(query.sort),
            offset_idx = next_idx + 1,
        );
        let mut page = sqlx::query_as::<_, ProjectRow>(&page_sql);
        for arg in &args {
            page = match arg {
                FilterArg::Text(value) => page.bind(value),
                FilterArg::Bool(value) => page.bind(*value),
            };
        }
        let rows = page
            .bind(query.pagination.limit)
            .bind(query.pagination.offset)
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use showcase_core::project::{ProjectFilter, ProjectStatus};

    use super::*;

    #[test]
    fn default_listing_hides_deleted_only() {
        let (clause, args) = build_filter(&ProjectQuery::default());
        assert_eq!(clause, "WHERE NOT deleted");
        assert!(args.is_empty());
    }

    #[test]
    fn placeholders_follow_bind_order() {
        let query = ProjectQuery {
            filter: ProjectFilter {
                status: Some(ProjectStatus::Published),
                featured: Some(true),
                search: Some("50%_off".into()),
                include_deleted: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (clause, args) = build_filter(&query);
        assert!(clause.starts_with("WHERE status = $1 AND featured = $2 AND (id ILIKE $3"));
        assert_eq!(args.len(), 3);
        match &args[2] {
            FilterArg::Text(pattern) => assert_eq!(pattern, "%50\\%\\_off%"),
            FilterArg::Bool(_) => panic!("search binds text"),
        }
    }
}
