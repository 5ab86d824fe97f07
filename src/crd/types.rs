//! Status condition types reported by the Azure reconcilers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition type set by the extension reconcilers once bootstrap extensions
/// on a VM or scale set have finished provisioning
pub const BOOTSTRAP_SUCCEEDED_CONDITION: &str = "BootstrapSucceeded";

/// Reason used while a bootstrap extension is still provisioning
pub const BOOTSTRAP_IN_PROGRESS_REASON: &str = "BootstrapInProgress";

/// Reason used when a bootstrap extension ended in a failed state
pub const BOOTSTRAP_FAILED_REASON: &str = "BootstrapFailed";

/// Condition status following Kubernetes conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// How serious a False condition is, following Cluster API conventions
///
/// Only meaningful when the status is False; True conditions carry `None`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ConditionSeverity {
    /// Condition is False and the resource cannot make progress on its own
    Error,
    /// Condition is False and something may need attention
    Warning,
    /// Condition is False because work is still in progress
    Info,
    /// No severity (condition is True or Unknown)
    #[default]
    #[serde(rename = "")]
    None,
}

impl std::fmt::Display for ConditionSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Info => write!(f, "Info"),
            Self::None => write!(f, ""),
        }
    }
}

/// Kubernetes-style condition for status reporting
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Condition {
    /// Type of condition (e.g., BootstrapSucceeded)
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Severity when the condition is False
    #[serde(default, skip_serializing_if = "is_no_severity")]
    pub severity: ConditionSeverity,

    /// Machine-readable reason for the condition
    #[serde(default)]
    pub reason: String,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Last time the condition transitioned
    #[serde(rename = "lastTransitionTime")]
    pub last_transition_time: DateTime<Utc>,
}

fn is_no_severity(severity: &ConditionSeverity) -> bool {
    *severity == ConditionSeverity::None
}

impl Condition {
    /// Create a new condition with the current timestamp
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            severity: ConditionSeverity::None,
            reason: reason.into(),
            message: message.into(),
            last_transition_time: Utc::now(),
        }
    }

    /// A True condition with no reason
    pub fn true_condition(type_: impl Into<String>) -> Self {
        Self::new(type_, ConditionStatus::True, "", "")
    }

    /// A False condition with a reason and severity
    pub fn false_condition(
        type_: impl Into<String>,
        reason: impl Into<String>,
        severity: ConditionSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            ..Self::new(type_, ConditionStatus::False, reason, message)
        }
    }

    /// Returns true if this condition is True
    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    /// Returns true if status, severity and reason match `other`
    ///
    /// Timestamps and messages are ignored so re-setting an unchanged
    /// condition does not count as a transition.
    pub fn same_state(&self, other: &Condition) -> bool {
        self.type_ == other.type_
            && self.status == other.status
            && self.severity == other.severity
            && self.reason == other.reason
    }
}
