//! Status types shared by the Azure reconcilers
//!
//! Conditions follow the Kubernetes/Cluster API shape so the enclosing
//! controller can copy them straight into a resource's status.

mod types;

pub use types::{
    Condition, ConditionSeverity, ConditionStatus, BOOTSTRAP_FAILED_REASON,
    BOOTSTRAP_IN_PROGRESS_REASON, BOOTSTRAP_SUCCEEDED_CONDITION,
};
