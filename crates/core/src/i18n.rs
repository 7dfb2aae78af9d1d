//! Bilingual field validation.
//!
//! Localised content is stored as `locale -> T`. The default locale is
//! mandatory; every other supported locale is optional but validated with
//! the same rules when present.

use std::collections::BTreeMap;

use validator::Validate;

use crate::error::CoreError;

pub const LOCALE_EN: &str = "en";
pub const LOCALE_FR: &str = "fr";

/// Locale every localised record must provide.
pub const DEFAULT_LOCALE: &str = LOCALE_EN;

pub const SUPPORTED_LOCALES: &[&str] = &[LOCALE_EN, LOCALE_FR];

pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Validate a localised map: default locale present, only supported
/// locales, and every entry passing its own `Validate` rules.
pub fn validate_localized<T: Validate>(
    field: &str,
    entries: &BTreeMap<String, T>,
) -> Result<(), CoreError> {
    if !entries.contains_key(DEFAULT_LOCALE) {
        return Err(CoreError::Validation(format!(
            "{field}: the '{DEFAULT_LOCALE}' locale is required"
        )));
    }
    for (locale, entry) in entries {
        if !is_supported_locale(locale) {
            return Err(CoreError::Validation(format!(
                "{field}: unsupported locale '{locale}'. Supported: {}",
                SUPPORTED_LOCALES.join(", ")
            )));
        }
        entry
            .validate()
            .map_err(|e| CoreError::Validation(format!("{field}.{locale}: {e}")))?;
    }
    Ok(())
}

/// Validate a plain `locale -> string` map (alt text). Nothing is mandatory.
pub fn validate_locale_keys(field: &str, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
    match entries.keys().find(|locale| !is_supported_locale(locale)) {
        Some(locale) => Err(CoreError::Validation(format!(
            "{field}: unsupported locale '{locale}'"
        ))),
        None => Ok(()),
    }
}

/// Reject strings that are empty once whitespace is trimmed.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Label {
        #[validate(length(min = 1, max = 5))]
        text: String,
    }

    fn label(text: &str) -> Label {
        Label { text: text.into() }
    }

    #[test]
    fn default_locale_is_mandatory() {
        let entries = BTreeMap::from([("fr".to_string(), label("abc"))]);
        assert!(validate_localized("title", &entries).is_err());
    }

    #[test]
    fn optional_locales_are_validated_when_present() {
        let entries = BTreeMap::from([
            ("en".to_string(), label("abc")),
            ("fr".to_string(), label("much too long")),
        ]);
        let err = validate_localized("title", &entries).unwrap_err().to_string();
        assert!(err.contains("title.fr"), "{err}");
    }

    #[test]
    fn unknown_locales_are_rejected() {
        let entries = BTreeMap::from([
            ("en".to_string(), label("abc")),
            ("de".to_string(), label("abc")),
        ]);
        assert!(validate_localized("title", &entries).is_err());
    }

    #[test]
    fn alt_text_keys_must_be_supported() {
        let ok = BTreeMap::from([("fr".to_string(), "Vue".to_string())]);
        assert!(validate_locale_keys("alt_text", &ok).is_ok());
        let bad = BTreeMap::from([("xx".to_string(), "?".to_string())]);
        assert!(validate_locale_keys("alt_text", &bad).is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank(" a ").is_ok());
    }
}
