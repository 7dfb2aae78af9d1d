//! Object keys for published assets.
//!
//! Keys look like `{root}/{category}/{hint}/{digest-prefix}.{ext}`. The hint
//! (project id, team member id, page slug) groups related assets, and the
//! content digest makes identical bytes land on the same key.

use showcase_core::media::UploadCategory;

/// Hex characters of the SHA-256 digest kept in the file name.
pub const DIGEST_PREFIX_LEN: usize = 20;

/// Slug-sanitise one path segment: lowercase ASCII alphanumerics, with any
/// other run of characters collapsed into a single hyphen. Returns `None`
/// when nothing usable is left.
pub fn sanitize_segment(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Build the object key for an asset.
///
/// `root` and `hint` may contain `/`-separated segments; each segment is
/// sanitised and empty ones are dropped, so `..` can never escape the root.
pub fn object_key(
    root: &str,
    category: UploadCategory,
    hint: &str,
    digest_hex: &str,
    extension: &str,
) -> String {
    let mut segments: Vec<String> = root.split('/').filter_map(sanitize_segment).collect();
    segments.push(category.name().to_string());
    segments.extend(hint.split('/').filter_map(sanitize_segment));

    let digest: String = digest_hex.chars().take(DIGEST_PREFIX_LEN).collect();
    segments.push(format!("{digest}.{extension}"));
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_and_lowercases() {
        assert_eq!(sanitize_segment("North Star!"), Some("north-star".into()));
        assert_eq!(sanitize_segment("--a__b--"), Some("a-b".into()));
        assert_eq!(sanitize_segment(".."), None);
        assert_eq!(sanitize_segment("Café"), Some("caf".into()));
    }

    #[test]
    fn key_layout() {
        let digest = "0123456789abcdef0123456789abcdef";
        assert_eq!(
            object_key("showcase", UploadCategory::Hero, "north-star", digest, "jpg"),
            "showcase/hero/north-star/0123456789abcdef0123.jpg"
        );
    }

    #[test]
    fn traversal_segments_are_dropped() {
        let key = object_key("site/../media", UploadCategory::Team, "../../etc", "ff", "png");
        assert_eq!(key, "site/media/team/etc/ff.png");
    }

    #[test]
    fn same_content_same_key() {
        let a = object_key("r", UploadCategory::Gallery, "p", "abc", "jpg");
        let b = object_key("r", UploadCategory::Gallery, "p", "abc", "jpg");
        assert_eq!(a, b);
    }
}
