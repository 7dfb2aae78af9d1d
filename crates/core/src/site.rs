//! Team members and page headers.
//!
//! Both follow the project record discipline: bilingual copy with a
//! mandatory default locale, validated before any change is applied, and an
//! append-only history entry per mutation. Page headers are keyed by page
//! slug and are upserted rather than created, so they cannot be deleted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::history::{ensure_active, record_change, Archivable, HistoryAction, HistoryEntry, Versioned};
use crate::i18n::{not_blank, validate_localized};
use crate::media::{MediaAsset, UploadCategory};
use crate::project::mutation::snapshot;
use crate::project::validation::{validate_asset, validate_slug};
use crate::types::{ActorId, Timestamp};

pub const TEAM_ENTITY: &str = "TeamMember";
pub const HEADER_ENTITY: &str = "PageHeader";

fn validate_category_asset(
    field: &str,
    category: UploadCategory,
    asset: &MediaAsset,
) -> Result<(), CoreError> {
    if asset.kind != category.media_kind() {
        return Err(CoreError::Validation(format!(
            "{field}: expected an asset of category '{category}'"
        )));
    }
    validate_asset(field, asset)
}

// ---------------------------------------------------------------------------
// Team members
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TeamText {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub role: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TeamMemberFields {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub order: i32,
    pub i18n: BTreeMap<String, TeamText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<MediaAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamMember {
    pub id: String,
    #[serde(flatten)]
    pub fields: TeamMemberFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: TeamMemberFields,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub updated_by: ActorId,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Versioned for TeamMemberRecord {
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

impl Archivable for TeamMemberRecord {
    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }
}

pub fn validate_team_fields(fields: &TeamMemberFields) -> Result<(), CoreError> {
    fields.validate()?;
    validate_localized("i18n", &fields.i18n)?;
    if let Some(photo) = &fields.photo {
        validate_category_asset("photo", UploadCategory::Team, photo)?;
    }
    Ok(())
}

pub fn new_team_member(
    input: NewTeamMember,
    actor: &str,
    now: Timestamp,
) -> Result<TeamMemberRecord, CoreError> {
    validate_slug("id", &input.id)?;
    validate_team_fields(&input.fields)?;

    let payload = snapshot(&input.fields)?;
    let mut record = TeamMemberRecord {
        id: input.id,
        fields: input.fields,
        deleted: false,
        created_at: now,
        updated_at: now,
        updated_by: actor.to_string(),
        history: Vec::new(),
    };
    record_change(&mut record, HistoryAction::Create, actor, now, Some(payload), true);
    Ok(record)
}

pub fn apply_team_replace(
    record: &mut TeamMemberRecord,
    fields: TeamMemberFields,
    actor: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, TEAM_ENTITY, &record.id)?;
    validate_team_fields(&fields)?;

    let payload = snapshot(&fields)?;
    record.fields = fields;
    record_change(record, HistoryAction::Put, actor, now, Some(payload), true);
    Ok(())
}

pub fn apply_team_photo(
    record: &mut TeamMemberRecord,
    photo: MediaAsset,
    actor: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, TEAM_ENTITY, &record.id)?;
    validate_category_asset("photo", UploadCategory::Team, &photo)?;

    let payload = serde_json::json!({ "photo": { "asset_id": &photo.asset_id } });
    record.fields.photo = Some(photo);
    record_change(record, HistoryAction::Patch, actor, now, Some(payload), true);
    Ok(())
}

/// Live team members in display order (`order`, then creation time).
pub fn sort_team(members: &mut [TeamMemberRecord]) {
    members.sort_by(|a, b| {
        a.fields
            .order
            .cmp(&b.fields.order)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

// ---------------------------------------------------------------------------
// Page headers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HeaderText {
    #[validate(length(min = 1, max = 160), custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 400))]
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHeaderFields {
    pub i18n: BTreeMap<String, HeaderText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<MediaAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHeaderRecord {
    pub page: String,
    #[serde(flatten)]
    pub fields: PageHeaderFields,
    pub updated_at: Timestamp,
    pub updated_by: ActorId,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Versioned for PageHeaderRecord {
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

pub fn validate_header_fields(fields: &PageHeaderFields) -> Result<(), CoreError> {
    validate_localized("i18n", &fields.i18n)?;
    if let Some(hero) = &fields.hero {
        validate_category_asset("hero", UploadCategory::Hero, hero)?;
    }
    Ok(())
}

/// Create or fully replace the header of `page`. The first write is
/// recorded as `create`, later ones as `put`.
pub fn upsert_header(
    existing: Option<PageHeaderRecord>,
    page: &str,
    fields: PageHeaderFields,
    actor: &str,
    now: Timestamp,
) -> Result<PageHeaderRecord, CoreError> {
    validate_slug("page", page)?;
    validate_header_fields(&fields)?;

    let payload = snapshot(&fields)?;
    let (mut record, action) = match existing {
        Some(mut record) => {
            record.fields = fields;
            (record, HistoryAction::Put)
        }
        None => (
            PageHeaderRecord {
                page: page.to_string(),
                fields,
                updated_at: now,
                updated_by: actor.to_string(),
                history: Vec::new(),
            },
            HistoryAction::Create,
        ),
    };
    record_change(&mut record, action, actor, now, Some(payload), true);
    Ok(record)
}

pub fn apply_header_hero(
    record: &mut PageHeaderRecord,
    hero: MediaAsset,
    actor: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    validate_category_asset("hero", UploadCategory::Hero, &hero)?;

    let payload = serde_json::json!({ "hero": { "asset_id": &hero.asset_id } });
    record.fields.hero = Some(hero);
    record_change(record, HistoryAction::Patch, actor, now, Some(payload), true);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
