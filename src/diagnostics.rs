//! Warn-once diagnostic tracking for policy reads.
//!
//! Every read of a policy lands in exactly one of five situations, derived
//! from immutable metadata plus the "is explicitly set" bit:
//!
//! - REMOVED: a removal notice, regardless of explicit-set status.
//! - DEPRECATED and unset: a deprecation notice asking for an explicit value.
//! - DEPRECATED and set: a shorter deprecation notice.
//! - CURRENT, unset, with a configured warning: that warning plus an
//!   explicit-set request.
//! - CURRENT otherwise: silence.
//!
//! Each notice fires at most once per (policy, situation) for the life of the
//! process. An explicit set re-arms everything except the removal notice.
use crate::policy::Policy;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Lifecycle stage derived from a policy's metadata. `removed` takes
/// precedence over `deprecated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Current,
    Deprecated,
    Removed,
}

impl LifecycleStage {
    pub fn of(policy: &Policy) -> Self {
        if policy.removed.is_some() {
            Self::Removed
        } else if policy.deprecated.is_some() {
            Self::Deprecated
        } else {
            Self::Current
        }
    }
}

/// Destination for policy notices.
///
/// Notices are informational: they never abort an operation and never change
/// the value a read returns. Hosts plug in their own sink instead of the
/// registry writing to stdout.
pub trait DiagnosticSink {
    fn emit(&mut self, message: &str);
}

/// Default sink: forwards notices to `tracing::warn!`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Sink that collects notices in memory behind a shared handle.
///
/// Clones share the same buffer, so a caller can hand one clone to the
/// engine and read messages back through another.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Return collected messages and clear the buffer.
    pub fn drain(&self) -> Vec<String> {
        self.messages.borrow_mut().drain(..).collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Per-policy warn-once flags.
#[derive(Debug, Default, Clone)]
struct DiagnosticState {
    warned_current: bool,
    warned_deprecated_unset: bool,
    warned_deprecated_set: bool,
    warned_removed: bool,
}

/// Tracks which (policy, situation) pairs have already produced a notice.
#[derive(Debug, Default)]
pub struct DiagnosticTracker {
    states: HashMap<String, DiagnosticState>,
}

impl DiagnosticTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm the resettable notices after an explicit set. The removal
    /// notice stays spent for the rest of the process run.
    pub fn reset_for_set(&mut self, name: &str) {
        if let Some(state) = self.states.get_mut(name) {
            state.warned_current = false;
            state.warned_deprecated_unset = false;
            state.warned_deprecated_set = false;
        }
    }

    /// Evaluate a read, emitting at most one notice for the policy's current
    /// situation.
    pub fn evaluate(&mut self, policy: &Policy, sink: &mut dyn DiagnosticSink) {
        let state = self.states.entry(policy.name.clone()).or_default();
        match LifecycleStage::of(policy) {
            LifecycleStage::Removed => {
                if !state.warned_removed {
                    state.warned_removed = true;
                    sink.emit(&removed_notice(policy));
                }
            }
            LifecycleStage::Deprecated => {
                if policy.is_default() {
                    if !state.warned_deprecated_unset {
                        state.warned_deprecated_unset = true;
                        sink.emit(&deprecated_unset_notice(policy));
                    }
                } else if !state.warned_deprecated_set {
                    state.warned_deprecated_set = true;
                    sink.emit(&deprecated_set_notice(policy));
                }
            }
            LifecycleStage::Current => {
                let warning = match policy.warning.as_deref() {
                    Some(warning) if !warning.is_empty() => warning,
                    _ => return,
                };
                if policy.is_default() && !state.warned_current {
                    state.warned_current = true;
                    sink.emit(&current_notice(policy, warning));
                }
            }
        }
    }
}

fn removed_notice(policy: &Policy) -> String {
    let removed = policy
        .removed
        .as_ref()
        .map(|version| version.to_string())
        .unwrap_or_default();
    format!(
        "policy '{}' was removed in version {removed} and no longer has any effect; \
         stop referencing it",
        policy.name
    )
}

fn deprecated_unset_notice(policy: &Policy) -> String {
    let deprecated = policy
        .deprecated
        .as_ref()
        .map(|version| version.to_string())
        .unwrap_or_default();
    format!(
        "policy '{}' is deprecated since version {deprecated} and is not set; it will be \
         removed in a future release. Set it to NEW or OLD explicitly to silence this notice.",
        policy.name
    )
}

fn deprecated_set_notice(policy: &Policy) -> String {
    let deprecated = policy
        .deprecated
        .as_ref()
        .map(|version| version.to_string())
        .unwrap_or_default();
    format!(
        "policy '{}' is deprecated since version {deprecated}",
        policy.name
    )
}

fn current_notice(policy: &Policy, warning: &str) -> String {
    format!(
        "{warning}\nSet policy '{}' to NEW or OLD explicitly to silence this notice.",
        policy.name
    )
}
