//! Project entity model and DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::history::{Archivable, HistoryEntry, Versioned};
use crate::i18n::not_blank;
use crate::media::{MediaAsset, UploadCategory};
use crate::serde_helpers::double_option;
use crate::types::{ActorId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
}

impl ProjectStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(CoreError::Validation(format!(
                "Unknown project status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    Branding,
    Digital,
    Campaign,
    Production,
    Event,
}

impl ProjectCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Branding => "branding",
            Self::Digital => "digital",
            Self::Campaign => "campaign",
            Self::Production => "production",
            Self::Event => "event",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "branding" => Ok(Self::Branding),
            "digital" => Ok(Self::Digital),
            "campaign" => Ok(Self::Campaign),
            "production" => Ok(Self::Production),
            "event" => Ok(Self::Event),
            other => Err(CoreError::Validation(format!(
                "Unknown project category '{other}'"
            ))),
        }
    }
}

/// Named media slots on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    Hero,
    Thumb,
    Logo,
    Gallery,
    Videos,
}

impl MediaSlot {
    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Thumb => "thumb",
            Self::Logo => "logo",
            Self::Gallery => "gallery",
            Self::Videos => "videos",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hero" => Some(Self::Hero),
            "thumb" => Some(Self::Thumb),
            "logo" => Some(Self::Logo),
            "gallery" => Some(Self::Gallery),
            "videos" => Some(Self::Videos),
            _ => None,
        }
    }

    /// The only upload category whose assets may fill this slot.
    pub fn category(self) -> UploadCategory {
        match self {
            Self::Hero => UploadCategory::Hero,
            Self::Thumb => UploadCategory::Thumb,
            Self::Logo => UploadCategory::Logo,
            Self::Gallery => UploadCategory::Gallery,
            Self::Videos => UploadCategory::Video,
        }
    }

    /// Default slot for an upload category, when a project slot exists for it.
    pub fn for_category(category: UploadCategory) -> Option<Self> {
        match category {
            UploadCategory::Hero => Some(Self::Hero),
            UploadCategory::Thumb => Some(Self::Thumb),
            UploadCategory::Logo => Some(Self::Logo),
            UploadCategory::Gallery => Some(Self::Gallery),
            UploadCategory::Video => Some(Self::Videos),
            UploadCategory::Team => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Localised project copy for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectText {
    #[validate(length(min = 1, max = 160), custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 400))]
    pub excerpt: String,
    #[serde(default)]
    #[validate(length(max = 20000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<MediaAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<MediaAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<MediaAsset>,
    #[serde(default)]
    pub gallery: Vec<MediaAsset>,
    #[serde(default)]
    pub videos: Vec<MediaAsset>,
}

impl ProjectMedia {
    /// Place an asset into a slot: single slots are replaced, list slots
    /// are appended to.
    pub fn attach(&mut self, slot: MediaSlot, asset: MediaAsset) {
        match slot {
            MediaSlot::Hero => self.hero = Some(asset),
            MediaSlot::Thumb => self.thumb = Some(asset),
            MediaSlot::Logo => self.logo = Some(asset),
            MediaSlot::Gallery => self.gallery.push(asset),
            MediaSlot::Videos => self.videos.push(asset),
        }
    }
}

// ---------------------------------------------------------------------------
// Records and DTOs
// ---------------------------------------------------------------------------

/// The caller-writable part of a project. Used as the `put` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectFields {
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    pub category: ProjectCategory,
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub client: Option<String>,
    pub i18n: BTreeMap<String, ProjectText>,
    #[serde(default)]
    pub media: ProjectMedia,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProjectFields,
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProjectFields,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub updated_by: ActorId,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Versioned for ProjectRecord {
    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn history_mut(&mut self) -> &mut Vec<HistoryEntry> {
        &mut self.history
    }

    fn touch(&mut self, at: Timestamp, actor: &str) {
        self.updated_at = at;
        self.updated_by = actor.to_string();
    }
}

impl Archivable for ProjectRecord {
    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }
}

/// Partial media update. `null` clears a single slot; list slots are
/// replaced wholesale when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaPatch {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub hero: Option<Option<MediaAsset>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb: Option<Option<MediaAsset>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo: Option<Option<MediaAsset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<MediaAsset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<MediaAsset>>,
}

/// DTO for a partial project update (`patch`). Absent fields are left as
/// they are. The id, history and timestamps are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub client: Option<Option<String>>,
    /// Per-locale replacement; `null` removes an optional locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<BTreeMap<String, Option<ProjectText>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_flatten_into_the_record_json() {
        let json = serde_json::json!({
            "id": "harbour-lights",
            "category": "event",
            "city": "Lyon",
            "i18n": { "en": { "title": "Harbour Lights" } },
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "updated_by": "editor-1"
        });
        let record: ProjectRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.fields.status, ProjectStatus::Draft);
        assert!(!record.fields.featured);
        assert!(record.history.is_empty());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["city"], "Lyon");
        assert_eq!(back["status"], "draft");
        assert!(back.get("fields").is_none());
    }

    #[test]
    fn patch_rejects_immutable_fields() {
        let result: Result<ProjectPatch, _> =
            serde_json::from_value(serde_json::json!({ "id": "other" }));
        assert!(result.is_err());
    }

    #[test]
    fn patch_null_clears_client() {
        let patch: ProjectPatch =
            serde_json::from_value(serde_json::json!({ "client": null })).unwrap();
        assert_eq!(patch.client, Some(None));
    }

    #[test]
    fn slots_map_to_exactly_one_category() {
        for slot in [
            MediaSlot::Hero,
            MediaSlot::Thumb,
            MediaSlot::Logo,
            MediaSlot::Gallery,
            MediaSlot::Videos,
        ] {
            assert_eq!(MediaSlot::for_category(slot.category()), Some(slot));
            assert_eq!(MediaSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(MediaSlot::for_category(UploadCategory::Team), None);
    }

    #[test]
    fn enum_names_parse_back() {
        assert_eq!(
            ProjectStatus::from_name("published").unwrap(),
            ProjectStatus::Published
        );
        assert_eq!(
            ProjectCategory::from_name("branding").unwrap(),
            ProjectCategory::Branding
        );
        assert!(ProjectCategory::from_name("misc").is_err());
    }
}
