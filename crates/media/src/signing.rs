//! Request signing for the media upload API.
//!
//! The API authenticates uploads with an HMAC-SHA256 over the canonical
//! parameter string: parameters sorted by name, joined as `name=value`
//! pairs separated by `&`. The file itself, `api_key` and `signature` are
//! never part of the signed string.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::PublishError;

type HmacSha256 = Hmac<Sha256>;

/// Parameters excluded from the canonical string.
const UNSIGNED_PARAMS: [&str; 3] = ["api_key", "file", "signature"];

/// Canonical `a=1&b=2` form of the signed parameters.
pub fn canonical_string(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .filter(|(name, _)| !UNSIGNED_PARAMS.contains(name))
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex-encoded HMAC-SHA256 of the canonical string under `secret`.
pub fn sign(params: &BTreeMap<&str, String>, secret: &str) -> Result<String, PublishError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PublishError::Encode(format!("invalid signing key: {e}")))?;
    mac.update(canonical_string(params).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("timestamp", "1760000000".to_string()),
            ("public_id", "showcase/hero/alpha/abc".to_string()),
            ("api_key", "key-123".to_string()),
        ])
    }

    #[test]
    fn canonical_string_is_sorted_and_skips_unsigned() {
        assert_eq!(
            canonical_string(&params()),
            "public_id=showcase/hero/alpha/abc&timestamp=1760000000"
        );
    }

    #[test]
    fn signature_is_hex_sha256_length() {
        let sig = sign(&params(), "secret").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_secret_and_params() {
        let a = sign(&params(), "secret").unwrap();
        assert_eq!(a, sign(&params(), "secret").unwrap());
        assert_ne!(a, sign(&params(), "other").unwrap());

        let mut changed = params();
        changed.insert("timestamp", "1760000001".into());
        assert_ne!(a, sign(&changed, "secret").unwrap());
    }

    #[test]
    fn api_key_does_not_affect_signature() {
        let mut changed = params();
        changed.insert("api_key", "rotated".into());
        assert_eq!(sign(&params(), "s").unwrap(), sign(&changed, "s").unwrap());
    }
}
