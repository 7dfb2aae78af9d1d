//! Shared query parameter types for API handlers.

use serde::Deserialize;

use showcase_core::project::{
    Pagination, ProjectCategory, ProjectFilter, ProjectQuery, ProjectSort, ProjectStatus,
};

/// Query parameters for `GET /projects`.
///
/// Limits are clamped by [`Pagination::new`].
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub status: Option<ProjectStatus>,
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    #[serde(alias = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    pub sort: Option<ProjectSort>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProjectListParams {
    /// Build the store query. Anonymous callers only ever see published,
    /// non-deleted projects whatever they ask for.
    pub fn into_query(self, public: bool) -> ProjectQuery {
        let (status, include_deleted) = if public {
            (Some(ProjectStatus::Published), false)
        } else {
            (self.status, self.include_deleted)
        };

        ProjectQuery {
            filter: ProjectFilter {
                status,
                category: self.category,
                featured: self.featured,
                search: self.search,
                include_deleted,
            },
            sort: self.sort.unwrap_or_default(),
            pagination: Pagination::new(self.limit, self.offset),
        }
    }
}

/// Query parameters for list endpoints that support an `include_deleted` flag.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeDeletedParams {
    #[serde(default)]
    pub include_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_queries_are_pinned_to_published() {
        let params = ProjectListParams {
            status: Some(ProjectStatus::Draft),
            include_deleted: true,
            limit: Some(10_000),
            ..Default::default()
        };
        let query = params.into_query(true);
        assert_eq!(query.filter.status, Some(ProjectStatus::Published));
        assert!(!query.filter.include_deleted);
        assert_eq!(query.pagination.limit, 200);
    }

    #[test]
    fn staff_queries_keep_their_filters() {
        let params = ProjectListParams {
            status: Some(ProjectStatus::Draft),
            include_deleted: true,
            sort: Some(ProjectSort::UpdatedDesc),
            ..Default::default()
        };
        let query = params.into_query(false);
        assert_eq!(query.filter.status, Some(ProjectStatus::Draft));
        assert!(query.filter.include_deleted);
        assert_eq!(query.sort, ProjectSort::UpdatedDesc);
    }
}
