//! Filtering, ordering and pagination of project listings.
//!
//! The file backend applies these rules in memory through [`select`]; the
//! PostgreSQL backend translates the same [`ProjectQuery`] into SQL and must
//! produce the same ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::project::model::{ProjectCategory, ProjectRecord, ProjectStatus};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Clamp a user-provided limit into `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    /// Case-insensitive substring over id, city, client and every locale's
    /// title, excerpt and description.
    pub search: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl ProjectFilter {
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        if record.deleted && !self.include_deleted {
            return false;
        }
        if self.status.is_some_and(|s| s != record.fields.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != record.fields.category) {
            return false;
        }
        if self.featured.is_some_and(|f| f != record.fields.featured) {
            return false;
        }
        match self.search_term() {
            Some(term) => search_haystack(record).any(|text| text.to_lowercase().contains(&term)),
            None => true,
        }
    }

    /// The trimmed, lowercased search term, if any.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn search_haystack(record: &ProjectRecord) -> impl Iterator<Item = &str> {
    let fields = &record.fields;
    [record.id.as_str(), fields.city.as_str()]
        .into_iter()
        .chain(fields.client.as_deref())
        .chain(fields.i18n.values().flat_map(|text| {
            [
                text.title.as_str(),
                text.excerpt.as_str(),
                text.description.as_str(),
            ]
        }))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    /// `order` ascending, ties broken by creation time (earlier first).
    #[default]
    Order,
    UpdatedDesc,
    CreatedDesc,
}

impl ProjectSort {
    pub fn compare(self, a: &ProjectRecord, b: &ProjectRecord) -> Ordering {
        let primary = match self {
            Self::Order => a
                .fields
                .order
                .cmp(&b.fields.order)
                .then(a.created_at.cmp(&b.created_at)),
            Self::UpdatedDesc => b.updated_at.cmp(&a.updated_at),
            Self::CreatedDesc => b.created_at.cmp(&a.created_at),
        };
        // Stable final tie-break so pages never overlap.
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Clamped pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
            offset: clamp_offset(offset),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    pub filter: ProjectFilter,
    pub sort: ProjectSort,
    pub pagination: Pagination,
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Apply a query to an in-memory collection.
pub fn select<'a, I>(records: I, query: &ProjectQuery) -> Page<ProjectRecord>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let mut matched: Vec<&ProjectRecord> = records
        .into_iter()
        .filter(|r| query.filter.matches(r))
        .collect();
    matched.sort_by(|a, b| query.sort.compare(a, b));

    let Pagination { limit, offset } = query.pagination;
    let total = matched.len() as i64;
    let items = matched
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect();

    Page {
        items,
        total,
        limit,
        offset,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
