//! Policy lifecycle registry for build-configuration switches.
//!
//! A policy is a named opt-in/opt-out behavioral switch with a NEW/OLD
//! value: it records the version that introduced it, a default, and
//! optionally the versions that deprecated or removed it, plus a warning for
//! reads that never chose a side. The registry owns the metadata, the
//! current values, and the warn-once diagnostic state; it never interprets
//! what a policy's NEW or OLD behavior actually does.
//!
//! Hosts construct a [`PolicyEngine`], register policies once at startup,
//! and read values wherever behavior branches. Reads emit lifecycle notices
//! (deprecation, removal, unset warnings) through a pluggable
//! [`DiagnosticSink`], each at most once per distinct situation per process
//! run.

pub mod cli;
mod diagnostics;
mod engine;
mod error;
mod manifest;
mod policy;
mod version;

pub use diagnostics::{DiagnosticSink, DiagnosticTracker, LifecycleStage, MemorySink, TracingSink};
pub use engine::PolicyEngine;
pub use error::PolicyError;
pub use manifest::{load_manifest, Manifest, ManifestPolicy};
pub use policy::{Policy, PolicyFields, PolicyRegistration, PolicyStore, PolicyValue};
pub use version::{compare_gte, Version};
