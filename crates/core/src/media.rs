//! Upload categories, the requirement table and the published media asset
//! model.
//!
//! [`UploadCategory::requirement`] is the single source of truth for what an
//! upload must look like. It is consulted by the validator and served as-is
//! to the admin UI for hinting, so every entry point sees the same rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MIME types
// ---------------------------------------------------------------------------

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";
pub const MIME_SVG: &str = "image/svg+xml";
pub const MIME_MP4: &str = "video/mp4";
pub const MIME_WEBM: &str = "video/webm";
pub const MIME_QUICKTIME: &str = "video/quicktime";

const PHOTO_MIME_TYPES: &[&str] = &[MIME_JPEG, MIME_PNG, MIME_WEBP];
const LOGO_MIME_TYPES: &[&str] = &[MIME_PNG, MIME_WEBP, MIME_SVG];
const VIDEO_MIME_TYPES: &[&str] = &[MIME_MP4, MIME_WEBM, MIME_QUICKTIME];

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Lowercase a MIME type and drop any parameters (`; charset=...`).
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Vector formats carry no intrinsic raster dimensions.
pub fn is_vector_mime(mime: &str) -> bool {
    normalize_mime(mime) == MIME_SVG
}

/// File extension used when storing content of the given MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match normalize_mime(mime).as_str() {
        MIME_JPEG => "jpg",
        MIME_PNG => "png",
        MIME_WEBP => "webp",
        MIME_SVG => "svg",
        MIME_MP4 => "mp4",
        MIME_WEBM => "webm",
        MIME_QUICKTIME => "mov",
        _ => "bin",
    }
}

// ---------------------------------------------------------------------------
// Requirement table
// ---------------------------------------------------------------------------

/// Constraints an upload of one category must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Required pixel width; `None` for categories without a raster rule.
    pub exact_width: Option<u32>,
    /// Required pixel height; `None` for categories without a raster rule.
    pub exact_height: Option<u32>,
    pub max_bytes: u64,
    pub allowed_mime_types: &'static [&'static str],
}

impl Requirement {
    /// Exact `(width, height)` this category demands, if any.
    pub fn exact_dimensions(&self) -> Option<(u32, u32)> {
        self.exact_width.zip(self.exact_height)
    }

    pub fn allows(&self, mime: &str) -> bool {
        let mime = normalize_mime(mime);
        self.allowed_mime_types.contains(&mime.as_str())
    }
}

const HERO: Requirement = Requirement {
    exact_width: Some(1920),
    exact_height: Some(1080),
    max_bytes: 5 * MIB,
    allowed_mime_types: PHOTO_MIME_TYPES,
};

const GALLERY: Requirement = Requirement {
    exact_width: Some(1600),
    exact_height: Some(1200),
    max_bytes: 4 * MIB,
    allowed_mime_types: PHOTO_MIME_TYPES,
};

const THUMB: Requirement = Requirement {
    exact_width: Some(800),
    exact_height: Some(600),
    max_bytes: MIB,
    allowed_mime_types: PHOTO_MIME_TYPES,
};

const TEAM: Requirement = Requirement {
    exact_width: Some(600),
    exact_height: Some(600),
    max_bytes: MIB,
    allowed_mime_types: PHOTO_MIME_TYPES,
};

const LOGO: Requirement = Requirement {
    exact_width: Some(512),
    exact_height: Some(512),
    max_bytes: 512 * KIB,
    allowed_mime_types: LOGO_MIME_TYPES,
};

const VIDEO: Requirement = Requirement {
    exact_width: None,
    exact_height: None,
    max_bytes: 200 * MIB,
    allowed_mime_types: VIDEO_MIME_TYPES,
};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A named upload purpose. Closed set: adding a category means adding a
/// variant and its requirement entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadCategory {
    Hero,
    Gallery,
    Thumb,
    Team,
    Logo,
    Video,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 6] = [
        Self::Hero,
        Self::Gallery,
        Self::Thumb,
        Self::Team,
        Self::Logo,
        Self::Video,
    ];

    /// Parse from the wire name. Returns `None` for unknown categories.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "hero" => Some(Self::Hero),
            "gallery" => Some(Self::Gallery),
            "thumb" => Some(Self::Thumb),
            "team" => Some(Self::Team),
            "logo" => Some(Self::Logo),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Gallery => "gallery",
            Self::Thumb => "thumb",
            Self::Team => "team",
            Self::Logo => "logo",
            Self::Video => "video",
        }
    }

    pub fn requirement(self) -> &'static Requirement {
        match self {
            Self::Hero => &HERO,
            Self::Gallery => &GALLERY,
            Self::Thumb => &THUMB,
            Self::Team => &TEAM,
            Self::Logo => &LOGO,
            Self::Video => &VIDEO,
        }
    }

    pub fn media_kind(self) -> MediaKind {
        match self {
            Self::Video => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

impl std::fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the requirement table as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementEntry {
    pub category: UploadCategory,
    #[serde(flatten)]
    pub requirement: &'static Requirement,
}

/// The full requirement table in category order.
pub fn requirement_table() -> Vec<RequirementEntry> {
    UploadCategory::ALL
        .iter()
        .map(|&category| RequirementEntry {
            category,
            requirement: category.requirement(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Published assets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// A published asset as returned by the remote media store.
///
/// Immutable once published: a new upload yields a new asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    pub asset_id: String,
    pub kind: MediaKind,
    /// Alternative text keyed by locale.
    #[serde(default)]
    pub alt_text: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Delivery format extension (`jpg`, `png`, `mp4`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
