//! Public registry API composing the store, the diagnostic tracker, and
//! version comparison.
//!
//! The engine is an explicit owned value, not ambient process state: tests
//! and hosts construct as many independent registries as they need. All
//! operations are synchronous and in-memory; a host that shares an engine
//! across threads wraps it in its own mutex.
use crate::diagnostics::{DiagnosticSink, DiagnosticTracker, TracingSink};
use crate::error::PolicyError;
use crate::policy::{Policy, PolicyFields, PolicyRegistration, PolicyStore, PolicyValue};
use crate::version::{compare_gte, Version};

/// Policy lifecycle registry.
pub struct PolicyEngine {
    store: PolicyStore,
    tracker: DiagnosticTracker,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyEngine {
    /// Engine with the default sink, which routes notices through
    /// `tracing::warn!`.
    pub fn new() -> Self {
        Self::with_sink(Box::new(TracingSink))
    }

    pub fn with_sink(sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            store: PolicyStore::new(),
            tracker: DiagnosticTracker::new(),
            sink,
        }
    }

    /// Register a policy. Metadata is immutable afterwards; only the value
    /// slot changes through [`set`](Self::set).
    pub fn register(&mut self, registration: PolicyRegistration) -> Result<(), PolicyError> {
        let name = registration.name.clone();
        self.store.register(registration)?;
        tracing::debug!(policy = %name, "registered policy");
        Ok(())
    }

    /// Explicitly set a policy's value. Re-arms every notice for the policy
    /// except the removal notice.
    pub fn set(&mut self, name: &str, value: PolicyValue) -> Result<(), PolicyError> {
        self.store.set(name, value)?;
        self.tracker.reset_for_set(name);
        Ok(())
    }

    /// Set from an untyped value string, as read from a command line or
    /// other text input. Values other than `NEW` and `OLD` fail with
    /// `InvalidValue`.
    pub fn set_from_str(&mut self, name: &str, value: &str) -> Result<(), PolicyError> {
        let parsed = PolicyValue::parse(value).ok_or_else(|| PolicyError::InvalidValue {
            name: name.to_string(),
            value: value.trim().to_string(),
        })?;
        self.set(name, parsed)
    }

    /// Read a policy's effective value: the explicit setting if present,
    /// else the default. Emits the appropriate lifecycle notice, at most
    /// once per situation, before returning.
    pub fn get(&mut self, name: &str) -> Result<PolicyValue, PolicyError> {
        let policy = self.store.get(name)?;
        self.tracker.evaluate(policy, self.sink.as_mut());
        Ok(policy.effective_value())
    }

    /// Bulk activation for a compatibility range, applied to every policy in
    /// registration order:
    ///
    /// 1. policies introduced at or before `minimum` are set NEW;
    /// 2. when `maximum` is given, policies introduced at or after `maximum`
    ///    are set OLD.
    ///
    /// Both steps run unconditionally per policy, so step 2 overrides step 1
    /// when both match. The `maximum` bound is inclusive on the OLD side: a
    /// policy introduced exactly at `maximum` ends OLD.
    pub fn version_range(
        &mut self,
        minimum: &Version,
        maximum: Option<&Version>,
    ) -> Result<(), PolicyError> {
        if let Some(maximum) = maximum {
            if maximum < minimum {
                return Err(PolicyError::InvalidRange {
                    minimum: minimum.to_string(),
                    maximum: maximum.to_string(),
                });
            }
        }
        let introductions: Vec<(String, Version)> = self
            .store
            .iter()
            .map(|policy| (policy.name.clone(), policy.introduced.clone()))
            .collect();
        for (name, introduced) in introductions {
            if compare_gte(minimum, &introduced) {
                self.set(&name, PolicyValue::New)?;
            }
            if let Some(maximum) = maximum {
                if compare_gte(&introduced, maximum) {
                    self.set(&name, PolicyValue::Old)?;
                }
            }
        }
        Ok(())
    }

    /// Human-readable summary of a policy's fields and effective value.
    pub fn info(&self, name: &str) -> Result<String, PolicyError> {
        let policy = self.store.get(name)?;
        let mut out = format!(
            "policy: {}\ndescription: {}\ndefault: {}\nintroduced: {}\n",
            policy.name, policy.description, policy.default, policy.introduced
        );
        if let Some(warning) = &policy.warning {
            out.push_str(&format!("warning: {warning}\n"));
        }
        if let Some(deprecated) = &policy.deprecated {
            out.push_str(&format!("deprecated: {deprecated}\n"));
        }
        if let Some(removed) = &policy.removed {
            out.push_str(&format!("removed: {removed}\n"));
        }
        let origin = if policy.is_default() {
            "default"
        } else {
            "explicit"
        };
        out.push_str(&format!("current: {} ({origin})\n", policy.effective_value()));
        Ok(out)
    }

    /// Read-only projection of a single policy. Unlike [`get`](Self::get),
    /// this never emits notices.
    pub fn fields(&self, name: &str) -> Result<PolicyFields, PolicyError> {
        Ok(PolicyFields::from_policy(self.store.get(name)?))
    }

    /// Registered policies in registration order.
    pub fn policies(&self) -> impl Iterator<Item = &Policy> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
