//! # Veristamp Testkit
//!
//! Testing utilities for the veristamp proof engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: documents with fixed canonical forms and
//!   fingerprints for cross-implementation verification
//! - **Generators**: proptest strategies for property-based testing
//! - **Fixtures**: a fully wired in-memory proof stack
//!
//! ## Golden Vectors
//!
//! ```rust
//! use veristamp_testkit::vectors::{all_vectors, fingerprint_vector};
//!
//! for vector in all_vectors() {
//!     let fingerprint = fingerprint_vector(&vector);
//!     assert_eq!(fingerprint.to_string(), vector.fingerprint);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use veristamp_core::fingerprint::fingerprint_value;
//! use veristamp_testkit::generators::document;
//!
//! proptest! {
//!     #[test]
//!     fn fingerprint_is_deterministic(doc in document()) {
//!         prop_assert_eq!(
//!             fingerprint_value(&doc).unwrap(),
//!             fingerprint_value(&doc).unwrap()
//!         );
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use veristamp_testkit::fixtures::{person_document, ProofFixture};
//!
//! let fixture = ProofFixture::new();
//! let document = person_document("123", "John Smith");
//! // fixture.issue(&document, "did:test:owner").await drives the
//! // whole pipeline inside a test runtime.
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{person_document, seeded_secret, ProofFixture};
pub use vectors::{all_vectors, GoldenVector};
