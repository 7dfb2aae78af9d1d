//! Featured-item gate.
//!
//! A record may only be featured when its hero image came from the trusted
//! media store and is at least as large as the hero requirement. The check
//! is lenient on dimensions ("at least", not "exactly") because assets
//! recorded before the strict validator existed may be slightly larger.

use crate::media::{MediaAsset, UploadCategory};
use crate::project::ProjectRecord;

/// Why the gate refused a featured record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeaturedRejection {
    #[error("Featured items need a hero image")]
    HeroMissing,

    #[error("Hero url '{url}' is not served by the trusted media store")]
    HeroNotFromTrustedStore { url: String },

    #[error(
        "Hero image is {width:?}x{height:?}; featured items need at least \
         {min_width}x{min_height}"
    )]
    HeroDimensionInvalid {
        width: Option<u32>,
        height: Option<u32>,
        min_width: u32,
        min_height: u32,
    },
}

impl FeaturedRejection {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeroMissing => "hero_missing",
            Self::HeroNotFromTrustedStore { .. } => "hero_not_from_trusted_store",
            Self::HeroDimensionInvalid { .. } => "hero_dimension_invalid",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeaturedGate {
    trusted_prefixes: Vec<String>,
}

impl FeaturedGate {
    /// Build a gate from configured URL prefixes. Blank entries are dropped.
    /// A gate without prefixes trusts nothing.
    pub fn new<I, S>(trusted_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trusted_prefixes = trusted_prefixes
            .into_iter()
            .map(Into::into)
            .map(|p: String| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { trusted_prefixes }
    }

    pub fn trusted_prefixes(&self) -> &[String] {
        &self.trusted_prefixes
    }

    /// `url` starts with a configured prefix on a path boundary, so
    /// `https://media.test/a` does not trust `https://media.test/abc`.
    pub fn is_trusted(&self, url: &str) -> bool {
        self.trusted_prefixes.iter().any(|prefix| {
            let Some(rest) = url.strip_prefix(prefix.as_str()) else {
                return false;
            };
            prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/')
        })
    }

    /// Check a candidate hero asset.
    pub fn check_hero(&self, hero: Option<&MediaAsset>) -> Result<(), FeaturedRejection> {
        let hero = match hero {
            Some(hero) if !hero.url.trim().is_empty() => hero,
            _ => return Err(FeaturedRejection::HeroMissing),
        };

        if !self.is_trusted(&hero.url) {
            return Err(FeaturedRejection::HeroNotFromTrustedStore {
                url: hero.url.clone(),
            });
        }

        let (min_width, min_height) = UploadCategory::Hero
            .requirement()
            .exact_dimensions()
            .unwrap_or((0, 0));
        let large_enough = match (hero.width, hero.height) {
            (Some(w), Some(h)) => w >= min_width && h >= min_height,
            _ => false,
        };
        if !large_enough {
            return Err(FeaturedRejection::HeroDimensionInvalid {
                width: hero.width,
                height: hero.height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }

    /// Check a project unconditionally.
    pub fn check(&self, record: &ProjectRecord) -> Result<(), FeaturedRejection> {
        self.check_hero(record.fields.media.hero.as_ref())
    }

    /// Check a prospective record state: only featured records are gated.
    pub fn enforce(&self, featured: bool, hero: Option<&MediaAsset>) -> Result<(), FeaturedRejection> {
        if featured {
            self.check_hero(hero)
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::media::MediaKind;

    fn gate() -> FeaturedGate {
        FeaturedGate::new(["https://media.test/showcase/", " "])
    }

    fn hero(url: &str, width: Option<u32>, height: Option<u32>) -> MediaAsset {
        MediaAsset {
            url: url.into(),
            asset_id: "hero/abc".into(),
            kind: MediaKind::Image,
            alt_text: BTreeMap::new(),
            width,
            height,
            duration_seconds: None,
            format: Some("jpg".into()),
            bytes: Some(512_000),
        }
    }

    #[test]
    fn blank_prefixes_are_ignored() {
        assert_eq!(gate().trusted_prefixes().len(), 1);
    }

    #[test]
    fn empty_gate_trusts_nothing() {
        let gate = FeaturedGate::default();
        assert!(!gate.is_trusted("https://media.test/showcase/a.jpg"));
    }

    #[test]
    fn prefix_match_respects_path_boundary() {
        let gate = FeaturedGate::new(["https://media.test/showcase"]);
        assert!(gate.is_trusted("https://media.test/showcase/hero/a.jpg"));
        assert!(!gate.is_trusted("https://media.test/showcase-evil/a.jpg"));
    }

    #[test]
    fn missing_hero() {
        assert_matches!(gate().check_hero(None), Err(FeaturedRejection::HeroMissing));
        let blank = hero(" ", Some(1920), Some(1080));
        assert_matches!(
            gate().check_hero(Some(&blank)),
            Err(FeaturedRejection::HeroMissing)
        );
    }

    #[test]
    fn untrusted_url_is_rejected_before_dimensions() {
        let h = hero("https://cdn.other.test/a.jpg", None, None);
        assert_matches!(
            gate().check_hero(Some(&h)),
            Err(FeaturedRejection::HeroNotFromTrustedStore { .. })
        );
    }

    #[test]
    fn dimensions_are_at_least_not_exact() {
        let url = "https://media.test/showcase/hero/a.jpg";
        assert!(gate().check_hero(Some(&hero(url, Some(1920), Some(1080)))).is_ok());
        assert!(gate().check_hero(Some(&hero(url, Some(2560), Some(1440)))).is_ok());
        assert_matches!(
            gate().check_hero(Some(&hero(url, Some(1919), Some(1080)))),
            Err(FeaturedRejection::HeroDimensionInvalid { .. })
        );
        assert_matches!(
            gate().check_hero(Some(&hero(url, None, Some(1080)))),
            Err(FeaturedRejection::HeroDimensionInvalid { width: None, .. })
        );
    }

    #[test]
    fn non_featured_records_are_not_gated() {
        assert!(gate().enforce(false, None).is_ok());
        assert!(gate().enforce(true, None).is_err());
    }
}
