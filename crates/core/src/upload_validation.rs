//! Upload validation against the requirement table.
//!
//! Pure functions: dimension decoding is done by the caller (see
//! [`crate::image_probe`]) and passed in, so every rule here can be tested
//! without touching bytes.

use crate::media::{is_vector_mime, normalize_mime, UploadCategory};

/// Why an upload was refused. Every variant has a stable [`code`](Self::code)
/// consumable by clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Unknown upload category '{0}'")]
    UnknownCategory(String),

    #[error("Content type '{mime}' is not accepted for category '{category}'")]
    UnsupportedType { category: String, mime: String },

    #[error("Declared content type '{declared}' does not match the file content ({detected})")]
    ContentMismatch { declared: String, detected: String },

    #[error("File is {actual_bytes} bytes; the limit is {max_bytes} bytes")]
    TooLarge { max_bytes: u64, actual_bytes: u64 },

    #[error(
        "Image is {actual_width}x{actual_height}; category '{category}' requires exactly \
         {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        category: String,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Could not read image dimensions for category '{category}'")]
    MissingDimensions { category: String },

    #[error("Category '{category}' cannot be attached to {target}")]
    TargetMismatch { category: String, target: String },
}

impl UploadRejection {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "unknown_category",
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::ContentMismatch { .. } => "content_mismatch",
            Self::TooLarge { .. } => "too_large",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::MissingDimensions { .. } => "missing_dimensions",
            Self::TargetMismatch { .. } => "target_mismatch",
        }
    }
}

/// Resolve a wire category name into the closed category enum.
pub fn parse_category(name: &str) -> Result<UploadCategory, UploadRejection> {
    UploadCategory::from_name(name).ok_or_else(|| UploadRejection::UnknownCategory(name.into()))
}

/// The content-type rule on its own. The declared type is known before the
/// body arrives, so callers run this first and never read a refused file.
pub fn check_type(category: UploadCategory, mime: &str) -> Result<(), UploadRejection> {
    if category.requirement().allows(mime) {
        Ok(())
    } else {
        Err(UploadRejection::UnsupportedType {
            category: category.name().into(),
            mime: normalize_mime(mime),
        })
    }
}

/// Check an upload against its category's requirement entry.
///
/// Checks run in a fixed order: content type, byte size, then dimensions.
/// Dimensions must match exactly; vector formats skip the dimension check.
pub fn validate(
    category: UploadCategory,
    mime: &str,
    byte_size: u64,
    dimensions: Option<(u32, u32)>,
) -> Result<(), UploadRejection> {
    let requirement = category.requirement();

    check_type(category, mime)?;

    if byte_size > requirement.max_bytes {
        return Err(UploadRejection::TooLarge {
            max_bytes: requirement.max_bytes,
            actual_bytes: byte_size,
        });
    }

    let Some((expected_width, expected_height)) = requirement.exact_dimensions() else {
        return Ok(());
    };
    if is_vector_mime(mime) {
        return Ok(());
    }

    let (actual_width, actual_height) =
        dimensions.ok_or_else(|| UploadRejection::MissingDimensions {
            category: category.name().into(),
        })?;

    if (actual_width, actual_height) != (expected_width, expected_height) {
        return Err(UploadRejection::DimensionMismatch {
            category: category.name().into(),
            expected_width,
            expected_height,
            actual_width,
            actual_height,
        });
    }

    Ok(())
}

/// String-category entry point: parse, then [`validate`].
pub fn validate_upload(
    category: &str,
    mime: &str,
    byte_size: u64,
    dimensions: Option<(u32, u32)>,
) -> Result<UploadCategory, UploadRejection> {
    let category = parse_category(category)?;
    validate(category, mime, byte_size, dimensions)?;
    Ok(category)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::media::{MIME_JPEG, MIME_MP4, MIME_PNG, MIME_SVG};

    #[test]
    fn exact_hero_passes() {
        let result = validate_upload("hero", MIME_JPEG, 1_500_000, Some((1920, 1080)));
        assert_eq!(result, Ok(UploadCategory::Hero));
    }

    #[test]
    fn unknown_category_is_rejected_first() {
        let result = validate_upload("banner", "application/pdf", u64::MAX, None);
        assert_matches!(result, Err(UploadRejection::UnknownCategory(name)) if name == "banner");
    }

    #[test]
    fn unsupported_type_precedes_size_and_dimensions() {
        let result = validate(UploadCategory::Hero, "image/gif", u64::MAX, Some((1, 1)));
        assert_matches!(result, Err(UploadRejection::UnsupportedType { .. }));
    }

    #[test]
    fn type_check_alone_needs_no_body() {
        assert_eq!(check_type(UploadCategory::Logo, "image/svg+xml"), Ok(()));
        assert_matches!(
            check_type(UploadCategory::Hero, "video/mp4"),
            Err(UploadRejection::UnsupportedType { category, mime }) if category == "hero" && mime == "video/mp4"
        );
    }

    #[test]
    fn too_large_precedes_dimensions() {
        let max = UploadCategory::Thumb.requirement().max_bytes;
        let result = validate(UploadCategory::Thumb, MIME_PNG, max + 1, Some((1, 1)));
        assert_matches!(
            result,
            Err(UploadRejection::TooLarge { max_bytes, actual_bytes }) if max_bytes == max && actual_bytes == max + 1
        );
    }

    #[test]
    fn size_at_limit_is_accepted() {
        let max = UploadCategory::Thumb.requirement().max_bytes;
        assert!(validate(UploadCategory::Thumb, MIME_PNG, max, Some((800, 600))).is_ok());
    }

    #[test]
    fn off_by_one_pixel_is_rejected_for_every_raster_category() {
        for category in UploadCategory::ALL {
            let Some((w, h)) = category.requirement().exact_dimensions() else {
                continue;
            };
            let mime = MIME_PNG;
            for dims in [(w + 1, h), (w - 1, h), (w, h + 1), (w, h - 1)] {
                let result = validate(category, mime, 10, Some(dims));
                assert!(
                    matches!(result, Err(UploadRejection::DimensionMismatch { .. })),
                    "{category} {dims:?}"
                );
            }
            assert!(validate(category, mime, 10, Some((w, h))).is_ok(), "{category}");
        }
    }

    #[test]
    fn larger_image_is_not_at_least_accepted() {
        let result = validate(UploadCategory::Hero, MIME_JPEG, 10, Some((3840, 2160)));
        assert_matches!(result, Err(UploadRejection::DimensionMismatch { .. }));
    }

    #[test]
    fn small_hero_png_reports_dimension_mismatch() {
        let result = validate(UploadCategory::Hero, MIME_PNG, 10_000, Some((1000, 600)));
        assert_matches!(
            result,
            Err(UploadRejection::DimensionMismatch {
                expected_width: 1920,
                expected_height: 1080,
                actual_width: 1000,
                actual_height: 600,
                ..
            })
        );
    }

    #[test]
    fn svg_logo_skips_dimension_check() {
        assert!(validate(UploadCategory::Logo, MIME_SVG, 2_000, None).is_ok());
    }

    #[test]
    fn raster_without_dimensions_is_rejected() {
        let result = validate(UploadCategory::Logo, MIME_PNG, 2_000, None);
        assert_matches!(result, Err(UploadRejection::MissingDimensions { .. }));
    }

    #[test]
    fn video_ignores_dimensions() {
        assert!(validate(UploadCategory::Video, MIME_MP4, 50_000_000, None).is_ok());
        assert!(validate(UploadCategory::Video, MIME_MP4, 50_000_000, Some((7, 3))).is_ok());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            UploadRejection::UnknownCategory("x".into()).code(),
            "unknown_category"
        );
        assert_eq!(
            UploadRejection::MissingDimensions {
                category: "hero".into()
            }
            .code(),
            "missing_dimensions"
        );
    }
}
