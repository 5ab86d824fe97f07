//! Virtual machine extension reconciliation
//!
//! For each desired extension the service reads the live extension and acts
//! on its provisioning state:
//!
//! - absent: create it (in the cluster's location), then wait for it to run
//! - succeeded: mark the bootstrap condition true
//! - creating, updating or unknown: retry later
//! - failed or canceled: surface a terminal error
//!
//! The service never deletes extensions; they go away with their VM.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::extensions::{build_extension, observe, report, ExtensionState, Parent};
use super::Service;
use crate::azure::{ProvisioningState, VmExtensionClient};
use crate::scope::VmExtensionScope;
use crate::Error;

/// Reconciles the VM extensions named by a [`VmExtensionScope`]
pub struct VmExtensionService {
    scope: Arc<dyn VmExtensionScope>,
    client: Arc<dyn VmExtensionClient>,
}

impl VmExtensionService {
    /// Create a service over the given scope and client
    pub fn new(scope: Arc<dyn VmExtensionScope>, client: Arc<dyn VmExtensionClient>) -> Self {
        Self { scope, client }
    }
}

#[async_trait]
impl Service for VmExtensionService {
    fn name(&self) -> &'static str {
        "vmextensions"
    }

    #[instrument(
        skip_all,
        name = "vmextensions.reconcile",
        fields(cluster = %self.scope.cluster_name())
    )]
    async fn reconcile(&self) -> Result<(), Error> {
        let resource_group = self.scope.resource_group();
        for spec in self.scope.vm_extension_specs() {
            let name = spec.extension.name.as_str();
            let vm = spec.vm_name.as_str();

            let existing = self.client.get(resource_group, vm, name).await;
            let mut state = observe(existing, name, Parent::Vm(vm), resource_group)?;

            if state == ExtensionState::Absent {
                info!(vm_extension = name, vm, "creating VM extension");
                let extension = build_extension(&spec.extension, Some(self.scope.location()));
                self.client
                    .create_or_update(resource_group, vm, name, extension)
                    .await
                    .map_err(|e| {
                        e.wrap(
                            "failed to create VM extension",
                            format!("{name} on {vm}"),
                            resource_group,
                        )
                    })?;
                info!(vm_extension = name, vm, "successfully created VM extension");
                // The new extension has not run yet
                state = ExtensionState::InProgress(ProvisioningState::Creating);
            }

            report(self.scope.as_ref(), &state, name, Parent::Vm(vm))?;
        }
        Ok(())
    }

    async fn delete(&self) -> Result<(), Error> {
        Ok(())
    }
}
