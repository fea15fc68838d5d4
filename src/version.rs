//! Dotted numeric version parsing and ordinal comparison.
use crate::error::PolicyError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted numeric version of up to three components.
///
/// Missing trailing components compare as zero, so `"3"` equals `"3.0.0"`.
/// Comparison is component-wise numeric, never lexicographic: `"2.10"` is
/// newer than `"2.9"`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: [u64; 3],
}

impl Version {
    /// Parse a version string. Fails on empty input, more than three
    /// components, or any non-numeric component.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PolicyError::InvalidVersion(text.to_string()));
        }
        let mut components = [0u64; 3];
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() > 3 {
            return Err(PolicyError::InvalidVersion(text.to_string()));
        }
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(PolicyError::InvalidVersion(text.to_string()));
            }
            *slot = part
                .parse::<u64>()
                .map_err(|_| PolicyError::InvalidVersion(text.to_string()))?;
        }
        Ok(Self {
            raw: trimmed.to_string(),
            components,
        })
    }

    /// The version string as originally written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// True iff `a >= b` under component-wise numeric comparison.
pub fn compare_gte(a: &Version, b: &Version) -> bool {
    a >= b
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = PolicyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
