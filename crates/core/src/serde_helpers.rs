//! Serde helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null` in patch bodies.
///
/// Use together with `#[serde(default)]`: a missing key stays `None`,
/// `null` becomes `Some(None)` (clear the value), and a value becomes
/// `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        client: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"client": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"client": "Acme"}"#).unwrap();
        assert_eq!(absent.client, None);
        assert_eq!(null.client, Some(None));
        assert_eq!(value.client, Some(Some("Acme".to_string())));
    }
}
