//! Database rows and their conversion into domain records.

use std::collections::BTreeMap;

use sqlx::types::Json;
use sqlx::FromRow;

use showcase_core::error::CoreError;
use showcase_core::history::HistoryEntry;
use showcase_core::media::MediaAsset;
use showcase_core::project::{
    ProjectCategory, ProjectFields, ProjectMedia, ProjectRecord, ProjectStatus, ProjectText,
};
use showcase_core::site::{
    HeaderText, PageHeaderFields, PageHeaderRecord, TeamMemberFields, TeamMemberRecord, TeamText,
};
use showcase_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub status: String,
    pub featured: bool,
    pub sort_order: i32,
    pub category: String,
    pub city: String,
    pub client: Option<String>,
    pub i18n: Json<BTreeMap<String, ProjectText>>,
    pub media: Json<ProjectMedia>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub updated_by: String,
    pub history: Json<Vec<HistoryEntry>>,
}

impl TryFrom<ProjectRow> for ProjectRecord {
    type Error = CoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(ProjectRecord {
            id: row.id,
            fields: ProjectFields {
                status: ProjectStatus::from_name(&row.status)?,
                featured: row.featured,
                order: row.sort_order,
                category: ProjectCategory::from_name(&row.category)?,
                city: row.city,
                client: row.client,
                i18n: row.i18n.0,
                media: row.media.0,
            },
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            history: row.history.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Team members
// ---------------------------------------------------------------------------

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
    pub i18n: Json<BTreeMap<String, TeamText>>,
    pub photo: Option<Json<MediaAsset>>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub updated_by: String,
    pub history: Json<Vec<HistoryEntry>>,
}

impl From<TeamMemberRow> for TeamMemberRecord {
    fn from(row: TeamMemberRow) -> Self {
        TeamMemberRecord {
            id: row.id,
            fields: TeamMemberFields {
                name: row.name,
                order: row.sort_order,
                i18n: row.i18n.0,
                photo: row.photo.map(|p| p.0),
            },
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            history: row.history.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Page headers
// ---------------------------------------------------------------------------

/// A row from the `page_headers` table.
#[derive(Debug, Clone, FromRow)]
pub struct PageHeaderRow {
    pub page: String,
    pub i18n: Json<BTreeMap<String, HeaderText>>,
    pub hero: Option<Json<MediaAsset>>,
    pub updated_at: Timestamp,
    pub updated_by: String,
    pub history: Json<Vec<HistoryEntry>>,
}

impl From<PageHeaderRow> for PageHeaderRecord {
    fn from(row: PageHeaderRow) -> Self {
        PageHeaderRecord {
            page: row.page,
            fields: PageHeaderFields {
                i18n: row.i18n.0,
                hero: row.hero.map(|h| h.0),
            },
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            history: row.history.0,
        }
    }
}
