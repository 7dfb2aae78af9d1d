//! Delivery formats and per-category encoding profiles.
//!
//! Photographic categories are delivered as lossy JPEG with a quality tuned
//! to how large the image is displayed. Logos keep sharp edges: raster logos
//! are re-encoded losslessly and SVG is stored as uploaded. Videos are never
//! re-encoded.

use showcase_core::media::{
    extension_for_mime, normalize_mime, UploadCategory, MIME_JPEG, MIME_PNG, MIME_SVG, MIME_WEBP,
};

use crate::error::PublishError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFormat {
    Jpeg { quality: u8 },
    Png,
    WebpLossless,
    /// Stored byte-for-byte (SVG logos).
    SvgPassthrough,
    /// Stored byte-for-byte with the source content type (videos).
    VideoPassthrough,
}

/// JPEG quality per photographic category.
pub fn jpeg_quality(category: UploadCategory) -> Option<u8> {
    match category {
        UploadCategory::Hero => Some(85),
        UploadCategory::Gallery => Some(82),
        UploadCategory::Team => Some(80),
        UploadCategory::Thumb => Some(76),
        UploadCategory::Logo | UploadCategory::Video => None,
    }
}

impl DeliveryFormat {
    /// Pick the delivery format for an upload. `requested` is an optional
    /// extension-style hint (`jpg`, `png`, `webp`); it may only choose among
    /// the formats the category allows.
    pub fn resolve(
        category: UploadCategory,
        source_mime: &str,
        requested: Option<&str>,
    ) -> Result<Self, PublishError> {
        let source = normalize_mime(source_mime);
        let requested = requested
            .map(|r| r.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|r| !r.is_empty());
        let unsupported = |format: &str| PublishError::UnsupportedFormat {
            category: category.name().into(),
            format: format.into(),
        };

        match category {
            UploadCategory::Video => Ok(Self::VideoPassthrough),
            UploadCategory::Logo if source == MIME_SVG => match requested.as_deref() {
                None | Some("svg") => Ok(Self::SvgPassthrough),
                Some(other) => Err(unsupported(other)),
            },
            UploadCategory::Logo => match requested.as_deref() {
                None if source == MIME_WEBP => Ok(Self::WebpLossless),
                None | Some("png") => Ok(Self::Png),
                Some("webp") => Ok(Self::WebpLossless),
                Some(other) => Err(unsupported(other)),
            },
            _ => {
                let quality = jpeg_quality(category).unwrap_or(80);
                match requested.as_deref() {
                    None | Some("jpg") | Some("jpeg") => Ok(Self::Jpeg { quality }),
                    Some("png") => Ok(Self::Png),
                    Some(other) => Err(unsupported(other)),
                }
            }
        }
    }

    /// Content type of the delivered object. Passthrough formats keep the
    /// source type.
    pub fn mime(self, source_mime: &str) -> String {
        match self {
            Self::Jpeg { .. } => MIME_JPEG.into(),
            Self::Png => MIME_PNG.into(),
            Self::WebpLossless => MIME_WEBP.into(),
            Self::SvgPassthrough => MIME_SVG.into(),
            Self::VideoPassthrough => normalize_mime(source_mime),
        }
    }

    pub fn extension(self, source_mime: &str) -> &'static str {
        extension_for_mime(&self.mime(source_mime))
    }

    pub fn is_passthrough(self) -> bool {
        matches!(self, Self::SvgPassthrough | Self::VideoPassthrough)
    }
}
