//! Policy manifest loading (policies.json).
//!
//! The manifest is how the CLI populates an engine; the library API itself
//! stays purely procedural. Field validation happens at registration, not at
//! parse time, so a manifest error names the offending policy.
use crate::engine::PolicyEngine;
use crate::error::PolicyError;
use crate::policy::PolicyRegistration;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub(crate) const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Top-level manifest parsed from JSON.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub schema_version: u32,
    #[serde(default)]
    pub policies: Vec<ManifestPolicy>,
}

/// One policy entry. Required fields are modeled as defaulted strings so a
/// missing field surfaces as `MissingField` with the policy's position, not
/// as an opaque parse error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestPolicy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub introduced: String,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub removed: Option<String>,
}

impl ManifestPolicy {
    pub fn to_registration(&self) -> Result<PolicyRegistration, PolicyError> {
        PolicyRegistration::from_parts(
            &self.name,
            &self.description,
            &self.default,
            &self.introduced,
            self.warning.as_deref(),
            self.deprecated.as_deref(),
            self.removed.as_deref(),
        )
    }
}

impl Manifest {
    /// Register every manifest entry into `engine`, in manifest order.
    pub fn register_into(&self, engine: &mut PolicyEngine) -> Result<()> {
        for (idx, entry) in self.policies.iter().enumerate() {
            let registration = entry
                .to_registration()
                .with_context(|| manifest_entry_label(idx, entry))?;
            engine
                .register(registration)
                .with_context(|| manifest_entry_label(idx, entry))?;
        }
        Ok(())
    }
}

fn manifest_entry_label(idx: usize, entry: &ManifestPolicy) -> String {
    if entry.name.trim().is_empty() {
        format!("register manifest policy #{idx}")
    } else {
        format!("register manifest policy '{}'", entry.name)
    }
}

/// Load and validate a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let manifest: Manifest =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        bail!(
            "unsupported manifest schema version {} in {} (expected {MANIFEST_SCHEMA_VERSION})",
            manifest.schema_version,
            path.display()
        );
    }
    Ok(manifest)
}
