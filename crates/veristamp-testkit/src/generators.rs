//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use veristamp_core::types::{Identity, ProofId, RecordId};
use veristamp_signer::KeySecret;

/// Generate a random RecordId.
pub fn record_id() -> impl Strategy<Value = RecordId> {
    any::<[u8; 32]>().prop_map(RecordId::from_bytes)
}

/// Generate a random namespaced ProofId.
pub fn proof_id() -> impl Strategy<Value = ProofId> {
    record_id().prop_map(ProofId::from_record)
}

/// Generate deterministic-looking key material.
pub fn key_secret() -> impl Strategy<Value = KeySecret> {
    any::<[u8; 32]>().prop_map(KeySecret::from_bytes)
}

/// Generate a DID-shaped identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    "did:[a-z]{3,8}:[a-z0-9]{4,16}".prop_map(Identity::from)
}

/// Generate an arbitrary JSON value, nested up to a few levels.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| Value::Number(i.into())),
        "[a-zA-Z0-9 _:.-]{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z@][a-zA-Z0-9]{0,7}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate a document that passes input validation: a non-empty
/// top-level object.
pub fn document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-zA-Z@][a-zA-Z0-9]{0,7}", json_value(), 1..6)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}
