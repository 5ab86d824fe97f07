//! Scopes handed to the Azure services by the enclosing controller
//!
//! A scope describes the cluster (resource group, location), supplies the
//! desired specs for each service, and receives condition updates. The
//! traits are what the services depend on; [`ClusterScope`] is an in-memory
//! implementation for callers that do not need their own.

use parking_lot::RwLock;
use tracing::debug;

use crate::azure::{PublicIpSpec, VmExtensionSpec, VmssExtensionSpec};
use crate::crd::Condition;

/// Describes the cluster the resources belong to
pub trait ClusterDescriber: Send + Sync {
    /// Name of the cluster
    fn cluster_name(&self) -> &str;

    /// Resource group holding the cluster's resources
    fn resource_group(&self) -> &str;

    /// Azure region of the cluster
    fn location(&self) -> &str;
}

/// Receives status conditions computed by the services
pub trait ConditionSetter: Send + Sync {
    /// Set (or replace) the condition with the same type
    fn set_condition(&self, condition: Condition);
}

/// Scope for the public IP service
pub trait PublicIpScope: ClusterDescriber {
    /// Public IPs that should exist
    fn public_ip_specs(&self) -> Vec<PublicIpSpec>;
}

/// Scope for the VM extension service
pub trait VmExtensionScope: ClusterDescriber + ConditionSetter {
    /// Extensions that should exist on the cluster's VMs
    fn vm_extension_specs(&self) -> Vec<VmExtensionSpec>;
}

/// Scope for the scale set extension service
pub trait VmssExtensionScope: ClusterDescriber + ConditionSetter {
    /// Extensions that should exist on the cluster's scale sets
    fn vmss_extension_specs(&self) -> Vec<VmssExtensionSpec>;
}

/// In-memory scope holding specs and the conditions set during a pass
#[derive(Debug, Default)]
pub struct ClusterScope {
    cluster_name: String,
    resource_group: String,
    location: String,
    public_ips: Vec<PublicIpSpec>,
    vm_extensions: Vec<VmExtensionSpec>,
    vmss_extensions: Vec<VmssExtensionSpec>,
    conditions: RwLock<Vec<Condition>>,
}

impl ClusterScope {
    /// Create a scope with no specs
    pub fn new(
        cluster_name: impl Into<String>,
        resource_group: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            resource_group: resource_group.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    /// Add a desired public IP
    pub fn with_public_ip(mut self, spec: PublicIpSpec) -> Self {
        self.public_ips.push(spec);
        self
    }

    /// Add a desired VM extension
    pub fn with_vm_extension(mut self, spec: VmExtensionSpec) -> Self {
        self.vm_extensions.push(spec);
        self
    }

    /// Add a desired scale set extension
    pub fn with_vmss_extension(mut self, spec: VmssExtensionSpec) -> Self {
        self.vmss_extensions.push(spec);
        self
    }

    /// Snapshot of all conditions set so far
    pub fn conditions(&self) -> Vec<Condition> {
        self.conditions.read().clone()
    }

    /// Current condition of the given type, if set
    pub fn condition(&self, type_: &str) -> Option<Condition> {
        self.conditions
            .read()
            .iter()
            .find(|c| c.type_ == type_)
            .cloned()
    }
}

impl ClusterDescriber for ClusterScope {
    fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    fn resource_group(&self) -> &str {
        &self.resource_group
    }

    fn location(&self) -> &str {
        &self.location
    }
}

impl ConditionSetter for ClusterScope {
    fn set_condition(&self, mut condition: Condition) {
        let mut conditions = self.conditions.write();
        match conditions.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(existing) => {
                // Only a change of status/severity/reason is a transition
                if existing.same_state(&condition) {
                    condition.last_transition_time = existing.last_transition_time;
                }
                *existing = condition;
            }
            None => {
                debug!(
                    cluster = %self.cluster_name,
                    condition = %condition.type_,
                    status = %condition.status,
                    "adding condition"
                );
                conditions.push(condition);
            }
        }
    }
}

impl PublicIpScope for ClusterScope {
    fn public_ip_specs(&self) -> Vec<PublicIpSpec> {
        self.public_ips.clone()
    }
}

impl VmExtensionScope for ClusterScope {
    fn vm_extension_specs(&self) -> Vec<VmExtensionSpec> {
        self.vm_extensions.clone()
    }
}

impl VmssExtensionScope for ClusterScope {
    fn vmss_extension_specs(&self) -> Vec<VmssExtensionSpec> {
        self.vmss_extensions.clone()
    }
}
