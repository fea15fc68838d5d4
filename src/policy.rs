//! Policy records and the append-only registry store.
//!
//! A policy's metadata is immutable after registration; only the
//! `current_value` slot changes, and only through `set`. The store keeps
//! insertion order so bulk activation walks policies in registration order.
use crate::error::PolicyError;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Behavioral switch setting: NEW selects the introduced behavior, OLD the
/// legacy one. The registry never interprets what either behavior means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyValue {
    New,
    Old,
}

impl PolicyValue {
    /// Parse the exact spellings `NEW` and `OLD`. Anything else is rejected;
    /// callers map the failure to `InvalidValue` or `InvalidDefault`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "NEW" => Some(Self::New),
            "OLD" => Some(Self::Old),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Old => "OLD",
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input record for `PolicyEngine::register`.
#[derive(Debug, Clone)]
pub struct PolicyRegistration {
    pub name: String,
    pub description: String,
    pub default: PolicyValue,
    pub introduced: Version,
    /// Warning shown on unset reads while the policy is CURRENT. Empty or
    /// absent means the CURRENT stage is silent.
    pub warning: Option<String>,
    pub deprecated: Option<Version>,
    /// Presence marks the policy REMOVED, taking precedence over
    /// `deprecated`.
    pub removed: Option<Version>,
}

impl PolicyRegistration {
    /// Build a registration from string fields, as read from a manifest.
    ///
    /// Absent required fields fail with `MissingField`; a present but
    /// unrecognized default fails with `InvalidDefault`.
    pub fn from_parts(
        name: &str,
        description: &str,
        default: &str,
        introduced: &str,
        warning: Option<&str>,
        deprecated: Option<&str>,
        removed: Option<&str>,
    ) -> Result<Self, PolicyError> {
        if name.trim().is_empty() {
            return Err(PolicyError::MissingField("name"));
        }
        if description.trim().is_empty() {
            return Err(PolicyError::MissingField("description"));
        }
        if default.trim().is_empty() {
            return Err(PolicyError::MissingField("default"));
        }
        if introduced.trim().is_empty() {
            return Err(PolicyError::MissingField("introduced"));
        }
        let default_value =
            PolicyValue::parse(default).ok_or_else(|| PolicyError::InvalidDefault {
                name: name.trim().to_string(),
                value: default.trim().to_string(),
            })?;
        let parse_optional = |text: Option<&str>| -> Result<Option<Version>, PolicyError> {
            match text.map(str::trim) {
                Some(text) if !text.is_empty() => Ok(Some(Version::parse(text)?)),
                _ => Ok(None),
            }
        };
        Ok(Self {
            name: name.trim().to_string(),
            description: description.to_string(),
            default: default_value,
            introduced: Version::parse(introduced)?,
            warning: warning.filter(|text| !text.is_empty()).map(str::to_string),
            deprecated: parse_optional(deprecated)?,
            removed: parse_optional(removed)?,
        })
    }
}

/// A registered policy: immutable metadata plus the mutable value slot.
#[derive(Debug, Clone)]
pub struct Policy {
    pub name: String,
    pub description: String,
    pub default: PolicyValue,
    pub introduced: Version,
    pub warning: Option<String>,
    pub deprecated: Option<Version>,
    pub removed: Option<Version>,
    pub(crate) current_value: Option<PolicyValue>,
}

impl Policy {
    /// The value a read returns: the explicit setting if present, else the
    /// default.
    pub fn effective_value(&self) -> PolicyValue {
        self.current_value.unwrap_or(self.default)
    }

    /// True while the policy has never been explicitly set.
    pub fn is_default(&self) -> bool {
        self.current_value.is_none()
    }
}

/// Read-only projection of a policy's metadata and effective value.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyFields {
    pub name: String,
    pub description: String,
    pub default: PolicyValue,
    pub introduced: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<String>,
    pub current_value: PolicyValue,
    pub is_default: bool,
}

impl PolicyFields {
    pub(crate) fn from_policy(policy: &Policy) -> Self {
        Self {
            name: policy.name.clone(),
            description: policy.description.clone(),
            default: policy.default,
            introduced: policy.introduced.to_string(),
            warning: policy.warning.clone(),
            deprecated: policy.deprecated.as_ref().map(Version::to_string),
            removed: policy.removed.as_ref().map(Version::to_string),
            current_value: policy.effective_value(),
            is_default: policy.is_default(),
        }
    }
}

/// Append-only-by-name registry of policies, preserving insertion order.
#[derive(Debug, Default)]
pub struct PolicyStore {
    policies: Vec<Policy>,
    index: HashMap<String, usize>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new policy. The name is a case-sensitive unique key.
    pub fn register(&mut self, registration: PolicyRegistration) -> Result<(), PolicyError> {
        if registration.name.trim().is_empty() {
            return Err(PolicyError::MissingField("name"));
        }
        if registration.description.trim().is_empty() {
            return Err(PolicyError::MissingField("description"));
        }
        if self.index.contains_key(&registration.name) {
            return Err(PolicyError::DuplicateName(registration.name));
        }
        let policy = Policy {
            name: registration.name.clone(),
            description: registration.description,
            default: registration.default,
            introduced: registration.introduced,
            warning: registration.warning.filter(|text| !text.is_empty()),
            deprecated: registration.deprecated,
            removed: registration.removed,
            current_value: None,
        };
        self.index.insert(registration.name, self.policies.len());
        self.policies.push(policy);
        Ok(())
    }

    /// Set a policy's explicit value. Metadata is untouched.
    pub fn set(&mut self, name: &str, value: PolicyValue) -> Result<(), PolicyError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| PolicyError::NotRegistered(name.to_string()))?;
        self.policies[idx].current_value = Some(value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Policy, PolicyError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| PolicyError::NotRegistered(name.to_string()))?;
        Ok(&self.policies[idx])
    }

    /// Policies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
