//! Header-only image inspection.
//!
//! Reads just enough of the file to learn its real format and pixel
//! dimensions; the pixel data is never decoded here.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::media::{is_vector_mime, normalize_mime, UploadCategory};
use crate::upload_validation::UploadRejection;

/// How far into an SVG file we look for the root element.
const SVG_SNIFF_BYTES: usize = 1024;

/// Sniff the real format of `bytes`, check it against `declared_mime` and
/// return the raster dimensions.
///
/// Returns `Ok(None)` for SVG, which has no intrinsic raster size. The
/// declared type is expected to be one `category` allows already.
pub fn probe_dimensions(
    bytes: &[u8],
    declared_mime: &str,
    category: UploadCategory,
) -> Result<Option<(u32, u32)>, UploadRejection> {
    let missing = || UploadRejection::MissingDimensions {
        category: category.name().into(),
    };
    let declared = normalize_mime(declared_mime);

    if is_vector_mime(&declared) {
        return if looks_like_svg(bytes) {
            Ok(None)
        } else {
            Err(UploadRejection::ContentMismatch {
                declared,
                detected: "not svg".into(),
            })
        };
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| missing())?;

    let detected = reader.format().ok_or_else(|| UploadRejection::ContentMismatch {
        declared: declared.clone(),
        detected: "unrecognised".into(),
    })?;

    if ImageFormat::from_mime_type(&declared) != Some(detected) {
        return Err(UploadRejection::ContentMismatch {
            declared,
            detected: detected.to_mime_type().to_string(),
        });
    }

    let dimensions = reader.into_dimensions().map_err(|_| missing())?;
    Ok(Some(dimensions))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SVG_SNIFF_BYTES)];
    String::from_utf8_lossy(head).contains("<svg")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
