//! Mutation rules for project records.
//!
//! Every function here validates first and only then touches the record,
//! so a rejected write leaves the record exactly as it was. Storage
//! backends load a record, call one of these functions and persist the
//! result together with the appended history entry.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::featured::FeaturedGate;
use crate::history::{ensure_active, record_change, restore, HistoryAction};
use crate::media::MediaAsset;
use crate::project::model::{
    MediaPatch, MediaSlot, NewProject, ProjectFields, ProjectMedia, ProjectPatch, ProjectRecord,
};
use crate::project::validation::{validate_fields, validate_slot_asset, validate_slug};
use crate::types::Timestamp;

pub const ENTITY: &str = "Project";

pub(crate) fn snapshot<T: Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value)
        .map_err(|e| CoreError::Internal(format!("Failed to snapshot payload: {e}")))
}

/// Validate a new project and build its record with a `create` entry.
pub fn new_record(
    input: NewProject,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> Result<ProjectRecord, CoreError> {
    validate_slug("id", &input.id)?;
    validate_fields(&input.fields)?;
    gate.enforce(input.fields.featured, input.fields.media.hero.as_ref())?;

    let payload = snapshot(&input.fields)?;
    let mut record = ProjectRecord {
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

/// Full replacement of the writable fields (`put`).
pub fn apply_replace(
    record: &mut ProjectRecord,
    fields: ProjectFields,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, ENTITY, &record.id)?;
    validate_fields(&fields)?;
    gate.enforce(fields.featured, fields.media.hero.as_ref())?;

    let payload = snapshot(&fields)?;
    record.fields = fields;
    record_change(record, HistoryAction::Put, actor, now, Some(payload), true);
    Ok(())
}

/// Compute the merged field set without touching the record.
pub fn merge_fields(base: &ProjectFields, patch: ProjectPatch) -> ProjectFields {
    let mut merged = base.clone();

    if let Some(status) = patch.status {
        merged.status = status;
    }
    if let Some(featured) = patch.featured {
        merged.featured = featured;
    }
    if let Some(order) = patch.order {
        merged.order = order;
    }
    if let Some(category) = patch.category {
        merged.category = category;
    }
    if let Some(city) = patch.city {
        merged.city = city;
    }
    if let Some(client) = patch.client {
        merged.client = client;
    }
    if let Some(i18n) = patch.i18n {
        for (locale, text) in i18n {
            match text {
                Some(text) => {
                    merged.i18n.insert(locale, text);
                }
                None => {
                    merged.i18n.remove(&locale);
                }
            }
        }
    }
    if let Some(media) = patch.media {
        merge_media(&mut merged.media, media);
    }
    merged
}

fn merge_media(media: &mut ProjectMedia, patch: MediaPatch) {
    if let Some(hero) = patch.hero {
        media.hero = hero;
    }
    if let Some(thumb) = patch.thumb {
        media.thumb = thumb;
    }
    if let Some(logo) = patch.logo {
        media.logo = logo;
    }
    if let Some(gallery) = patch.gallery {
        media.gallery = gallery;
    }
    if let Some(videos) = patch.videos {
        media.videos = videos;
    }
}

/// Partial update (`patch`). The merged record is re-validated and, when it
/// ends up featured, re-gated.
pub fn apply_merge(
    record: &mut ProjectRecord,
    patch: ProjectPatch,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, ENTITY, &record.id)?;
    let payload = snapshot(&patch)?;
    let merged = merge_fields(&record.fields, patch);
    validate_fields(&merged)?;
    gate.enforce(merged.featured, merged.media.hero.as_ref())?;

    record.fields = merged;
    record_change(record, HistoryAction::Patch, actor, now, Some(payload), true);
    Ok(())
}

/// Move a record within the listing order.
pub fn apply_reorder(
    record: &mut ProjectRecord,
    order: i32,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, ENTITY, &record.id)?;
    gate.enforce(record.fields.featured, record.fields.media.hero.as_ref())?;

    record.fields.order = order;
    record_change(
        record,
        HistoryAction::Reorder,
        actor,
        now,
        Some(json!({ "order": order })),
        true,
    );
    Ok(())
}

/// Bring a soft-deleted project back.
///
/// A featured record is re-checked against the current gate: when its hero
/// no longer passes (the trusted prefixes changed while it was deleted) it
/// comes back unfeatured, and the `restore` entry records the demotion.
/// Returns `true` when the deleted flag actually changed.
pub fn apply_restore(
    record: &mut ProjectRecord,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> bool {
    let demotion = if record.deleted && record.fields.featured {
        gate.check_hero(record.fields.media.hero.as_ref()).err()
    } else {
        None
    };
    let Some(rejection) = demotion else {
        return restore(record, actor, now);
    };

    record.deleted = false;
    record.fields.featured = false;
    record_change(
        record,
        HistoryAction::Restore,
        actor,
        now,
        Some(json!({ "featured": false, "reason": rejection.code() })),
        true,
    );
    true
}

/// Attach a freshly published asset to a slot. Recorded as a `patch` whose
/// snapshot names the slot and asset id.
pub fn apply_attach(
    record: &mut ProjectRecord,
    slot: MediaSlot,
    asset: MediaAsset,
    actor: &str,
    gate: &FeaturedGate,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_active(&*record, ENTITY, &record.id)?;
    validate_slot_asset(slot, &asset)?;

    let mut media = record.fields.media.clone();
    let payload = json!({ "media": { "slot": slot.name(), "asset_id": &asset.asset_id } });
    media.attach(slot, asset);
    gate.enforce(record.fields.featured, media.hero.as_ref())?;

    record.fields.media = media;
    record_change(record, HistoryAction::Patch, actor, now, Some(payload), true);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
