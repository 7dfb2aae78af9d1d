//! Storage seams.
//!
//! Handlers and the upload pipeline only see these traits; the file-backed
//! and PostgreSQL backends in `showcase-db` implement them by loading a
//! record, applying the shared mutation rules and persisting the result
//! together with its new history entry.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::featured::FeaturedGate;
use crate::media::{MediaAsset, UploadCategory};
use crate::project::{
    MediaSlot, NewProject, Page, ProjectFields, ProjectPatch, ProjectQuery, ProjectRecord,
};
use crate::site::{
    NewTeamMember, PageHeaderFields, PageHeaderRecord, TeamMemberFields, TeamMemberRecord,
};
use crate::upload_validation::UploadRejection;

/// Where an uploaded asset ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachTarget {
    Project { id: String, slot: MediaSlot },
    TeamMember { id: String },
    PageHeader { page: String },
}

impl AttachTarget {
    /// Build a target from the wire fields of an upload form. For projects
    /// the slot defaults to the one matching `category`.
    pub fn parse(
        kind: &str,
        id: &str,
        slot: Option<&str>,
        category: UploadCategory,
    ) -> Result<Self, UploadRejection> {
        let mismatch = || UploadRejection::TargetMismatch {
            category: category.name().into(),
            target: match slot {
                Some(slot) => format!("{kind}.{slot}"),
                None => kind.to_string(),
            },
        };
        match kind {
            "project" => {
                let slot = match slot {
                    Some(name) => MediaSlot::from_name(name).ok_or_else(mismatch)?,
                    None => MediaSlot::for_category(category).ok_or_else(mismatch)?,
                };
                Ok(Self::Project {
                    id: id.to_string(),
                    slot,
                })
            }
            "team" => Ok(Self::TeamMember { id: id.to_string() }),
            "header" => Ok(Self::PageHeader {
                page: id.to_string(),
            }),
            _ => Err(mismatch()),
        }
    }

    /// The only upload category compatible with this target.
    pub fn required_category(&self) -> UploadCategory {
        match self {
            Self::Project { slot, .. } => slot.category(),
            Self::TeamMember { .. } => UploadCategory::Team,
            Self::PageHeader { .. } => UploadCategory::Hero,
        }
    }

    pub fn accepts(&self, category: UploadCategory) -> bool {
        self.required_category() == category
    }

    /// Slug used to group the published asset in the media store.
    pub fn hint(&self) -> &str {
        match self {
            Self::Project { id, .. } | Self::TeamMember { id } => id,
            Self::PageHeader { page } => page,
        }
    }
}

impl std::fmt::Display for AttachTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project { id, slot } => write!(f, "project '{id}' slot '{}'", slot.name()),
            Self::TeamMember { id } => write!(f, "team member '{id}'"),
            Self::PageHeader { page } => write!(f, "page header '{page}'"),
        }
    }
}

/// Project persistence. Every mutating call appends exactly one history
/// entry in the same write as the change itself.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Cheap liveness probe of the backing storage.
    async fn ping(&self) -> Result<(), CoreError>;

    async fn create(
        &self,
        input: NewProject,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;

    /// Fetch by id. Soft-deleted records are returned too.
    async fn get(&self, id: &str) -> Result<ProjectRecord, CoreError>;

    async fn list(&self, query: &ProjectQuery) -> Result<Page<ProjectRecord>, CoreError>;

    async fn replace(
        &self,
        id: &str,
        fields: ProjectFields,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;

    async fn merge(
        &self,
        id: &str,
        patch: ProjectPatch,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;

    async fn soft_delete(&self, id: &str, actor: &str) -> Result<ProjectRecord, CoreError>;

    /// Restore a soft-deleted project. A featured record whose hero no
    /// longer passes `gate` comes back unfeatured.
    async fn restore(
        &self,
        id: &str,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;

    async fn reorder(
        &self,
        id: &str,
        order: i32,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;

    async fn attach_media(
        &self,
        id: &str,
        slot: MediaSlot,
        asset: MediaAsset,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError>;
}

/// Team member and page header persistence.
#[async_trait]
pub trait SiteContentStore: Send + Sync {
    async fn create_team_member(
        &self,
        input: NewTeamMember,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError>;

    async fn get_team_member(&self, id: &str) -> Result<TeamMemberRecord, CoreError>;

    /// Members in display order.
    async fn list_team(&self, include_deleted: bool) -> Result<Vec<TeamMemberRecord>, CoreError>;

    async fn replace_team_member(
        &self,
        id: &str,
        fields: TeamMemberFields,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError>;

    async fn soft_delete_team_member(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError>;

    async fn restore_team_member(&self, id: &str, actor: &str)
        -> Result<TeamMemberRecord, CoreError>;

    async fn attach_team_photo(
        &self,
        id: &str,
        photo: MediaAsset,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError>;

    async fn get_header(&self, page: &str) -> Result<PageHeaderRecord, CoreError>;

    async fn list_headers(&self) -> Result<Vec<PageHeaderRecord>, CoreError>;

    async fn upsert_header(
        &self,
        page: &str,
        fields: PageHeaderFields,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError>;

    /// Attach a hero to an existing header.
    async fn attach_header_hero(
        &self,
        page: &str,
        hero: MediaAsset,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError>;
}

/// A complete content backend.
pub trait ContentBackend: ContentStore + SiteContentStore {}

impl<T: ContentStore + SiteContentStore> ContentBackend for T {}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn project_slot_defaults_to_category() {
        let target = AttachTarget::parse("project", "north-star", None, UploadCategory::Gallery);
        assert_matches!(
            target,
            Ok(AttachTarget::Project {
                slot: MediaSlot::Gallery,
                ..
            })
        );
    }

    #[test]
    fn incompatible_targets() {
        assert_matches!(
            AttachTarget::parse("project", "x", None, UploadCategory::Team),
            Err(UploadRejection::TargetMismatch { .. })
        );
        assert_matches!(
            AttachTarget::parse("project", "x", Some("banner"), UploadCategory::Hero),
            Err(UploadRejection::TargetMismatch { .. })
        );
        assert_matches!(
            AttachTarget::parse("invoice", "x", None, UploadCategory::Hero),
            Err(UploadRejection::TargetMismatch { .. })
        );
    }

    #[test]
    fn targets_accept_exactly_one_category() {
        let hero_slot = AttachTarget::Project {
            id: "x".into(),
            slot: MediaSlot::Hero,
        };
        assert!(hero_slot.accepts(UploadCategory::Hero));
        assert!(!hero_slot.accepts(UploadCategory::Gallery));

        let team = AttachTarget::TeamMember { id: "lea".into() };
        assert!(team.accepts(UploadCategory::Team));
        assert!(!team.accepts(UploadCategory::Thumb));

        let header = AttachTarget::PageHeader {
            page: "about".into(),
        };
        assert!(header.accepts(UploadCategory::Hero));
        assert_eq!(header.hint(), "about");
    }
}
