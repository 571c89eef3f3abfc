//! Golden test vectors for deterministic canonicalization and hashing.
//!
//! Every implementation of the proof engine must canonicalize and
//! fingerprint these documents identically; the fingerprints below are
//! fixed expectations, not regeneratable snapshots.

use serde_json::Value;

use veristamp_core::canonical::canonical_json_string;
use veristamp_core::fingerprint::{fingerprint_value, Fingerprint};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Source document, in a deliberately non-canonical form.
    pub document: &'static str,
    /// Expected canonical encoding.
    pub canonical: &'static str,
    /// Expected self-describing fingerprint.
    pub fingerprint: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "person document",
            document: r#"{"type": "Person", "id": "123", "name": "John Smith"}"#,
            canonical: r#"{"id":"123","name":"John Smith","type":"Person"}"#,
            fingerprint: "sha256:67be05669bcd2082c8f2fa8c376d39b0fe5430fc78ef2c619fa7f9e8ec025aad",
        },
        GoldenVector {
            name: "nested containers and float collapse",
            document: r#"{"n": null, "b": [3, 1.0, "x"], "a": {"nested": true}}"#,
            canonical: r#"{"a":{"nested":true},"b":[3,1,"x"],"n":null}"#,
            fingerprint: "sha256:074bc8ada7cd98fd52cd95a95510ea56ee6f401c3376b0e2a1c2a76483088446",
        },
        GoldenVector {
            name: "unicode text and escapes",
            document: r#"{"text": "héllo\nworld", "emoji": "🎉"}"#,
            canonical: r#"{"emoji":"🎉","text":"héllo\nworld"}"#,
            fingerprint: "sha256:99ef491197c62a27eec344ef0b0873e9902c022b242e7a491760bb9387be790a",
        },
        GoldenVector {
            name: "number edge cases",
            document: r#"{"zero": 0, "neg": -42, "frac": 1.5, "big": 9007199254740991}"#,
            canonical: r#"{"big":9007199254740991,"frac":1.5,"neg":-42,"zero":0}"#,
            fingerprint: "sha256:edfb973025a0f97ccd4be82bb9ff58f83f7119f138f67619ff418d98aff591d1",
        },
    ]
}

/// Canonicalize a vector's document.
pub fn canonicalize_vector(vector: &GoldenVector) -> String {
    let value: Value = serde_json::from_str(vector.document).expect("vector document parses");
    canonical_json_string(&value).expect("vector document canonicalizes")
}

/// Fingerprint a vector's document.
pub fn fingerprint_vector(vector: &GoldenVector) -> Fingerprint {
    let value: Value = serde_json::from_str(vector.document).expect("vector document parses");
    fingerprint_value(&value).expect("vector document fingerprints")
}
