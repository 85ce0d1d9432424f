//! Cache key derivation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::descriptor::IconDescriptor;

/// Length of a derived cache key, in characters.
pub const KEY_LENGTH: usize = 22;

/// Derives the cache key for a canonical descriptor.
///
/// The descriptor is serialized to JSON (stable field order, default values
/// omitted), hashed with SHA-256, and the URL-safe base64 digest is truncated
/// to [`KEY_LENGTH`] characters. Callers are expected to pass the output of
/// [`canonicalize`](crate::canonicalize); this function does not normalize,
/// except that a non-finite scale is hashed as no scale.
pub fn derive_key(canonical: &IconDescriptor) -> String {
    let payload = if canonical.scale.is_some_and(|s| !s.is_finite()) {
        let mut finite = canonical.clone();
        finite.scale = None;
        serde_json::to_vec(&finite)
    } else {
        serde_json::to_vec(canonical)
    }
    .expect("descriptor of strings, bools and finite floats serializes");

    let mut hasher = Sha256::new();
    hasher.update(&payload);
    let digest = hasher.finalize();

    let mut key = URL_SAFE_NO_PAD.encode(digest);
    key.truncate(KEY_LENGTH);
    key
}
