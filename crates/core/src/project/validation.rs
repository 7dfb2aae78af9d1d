//! Structural validation shared by create, replace and merge.

use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::CoreError;
use crate::i18n::{validate_locale_keys, validate_localized};
use crate::media::{MediaAsset, MediaKind};
use crate::project::model::{MediaSlot, ProjectFields, ProjectMedia};

/// Maximum length of a record slug.
pub const MAX_SLUG_LEN: usize = 80;

/// Lowercase alphanumeric segments separated by single hyphens.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Validate a record identifier (project id, team member id, page slug).
pub fn validate_slug(kind: &str, slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "{kind} must be between 1 and {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "{kind} '{slug}' must be lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Validate every writable field of a project.
pub fn validate_fields(fields: &ProjectFields) -> Result<(), CoreError> {
    fields.validate()?;
    validate_localized("i18n", &fields.i18n)?;
    validate_media(&fields.media)
}

/// Check that every slot holds a well-formed asset of the right kind.
pub fn validate_media(media: &ProjectMedia) -> Result<(), CoreError> {
    let singles = [
        (MediaSlot::Hero, media.hero.as_ref()),
        (MediaSlot::Thumb, media.thumb.as_ref()),
        (MediaSlot::Logo, media.logo.as_ref()),
    ];
    for (slot, asset) in singles {
        if let Some(asset) = asset {
            validate_slot_asset(slot, asset)?;
        }
    }
    for asset in &media.gallery {
        validate_slot_asset(MediaSlot::Gallery, asset)?;
    }
    for asset in &media.videos {
        validate_slot_asset(MediaSlot::Videos, asset)?;
    }
    Ok(())
}

/// Validate an asset destined for `slot`.
pub fn validate_slot_asset(slot: MediaSlot, asset: &MediaAsset) -> Result<(), CoreError> {
    let field = format!("media.{}", slot.name());
    let expected = slot.category().media_kind();
    if asset.kind != expected {
        return Err(CoreError::Validation(format!(
            "{field}: expected a {expected:?} asset, got {:?}",
            asset.kind
        )));
    }
    validate_asset(&field, asset)
}

/// Shape checks that apply to any stored asset.
pub fn validate_asset(field: &str, asset: &MediaAsset) -> Result<(), CoreError> {
    if !(asset.url.starts_with("https://") || asset.url.starts_with("http://")) {
        return Err(CoreError::Validation(format!(
            "{field}: url must be an absolute http(s) URL"
        )));
    }
    if asset.asset_id.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{field}: asset_id must not be empty"
        )));
    }
    let zero_sized = asset.width == Some(0) || asset.height == Some(0);
    if asset.kind == MediaKind::Image && zero_sized {
        return Err(CoreError::Validation(format!(
            "{field}: recorded dimensions must be positive"
        )));
    }
    if let Some(duration) = asset.duration_seconds {
        if !duration.is_finite() || duration < 0.0 {
            return Err(CoreError::Validation(format!(
                "{field}: duration_seconds must be a non-negative number"
            )));
        }
    }
    validate_locale_keys(&format!("{field}.alt_text"), &asset.alt_text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
