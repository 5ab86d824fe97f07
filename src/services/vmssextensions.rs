//! Scale set extension reconciliation
//!
//! Same provisioning-state handling as the VM variant. Extensions created here
//! inherit the scale set's location, so none is sent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::extensions::{build_extension, observe, report, ExtensionState, Parent};
use super::Service;
use crate::azure::{ProvisioningState, VmssExtensionClient};
use crate::scope::VmssExtensionScope;
use crate::Error;

/// Reconciles the scale set extensions named by a [`VmssExtensionScope`]
pub struct VmssExtensionService {
    scope: Arc<dyn VmssExtensionScope>,
    client: Arc<dyn VmssExtensionClient>,
}

impl VmssExtensionService {
    /// Create a service over the given scope and client
    pub fn new(scope: Arc<dyn VmssExtensionScope>, client: Arc<dyn VmssExtensionClient>) -> Self {
        Self { scope, client }
    }
}

#[async_trait]
impl Service for VmssExtensionService {
    fn name(&self) -> &'static str {
        "vmssextensions"
    }

    #[instrument(
        skip_all,
        name = "vmssextensions.reconcile",
        fields(cluster = %self.scope.cluster_name())
    )]
    async fn reconcile(&self) -> Result<(), Error> {
        let resource_group = self.scope.resource_group();
        for spec in self.scope.vmss_extension_specs() {
            let name = spec.extension.name.as_str();
            let scale_set = spec.scale_set_name.as_str();
            let parent = Parent::ScaleSet(scale_set);

            let existing = self.client.get(resource_group, scale_set, name).await;
            let state = match observe(existing, name, parent, resource_group)? {
                ExtensionState::Absent => {
                    info!(vm_extension = name, scale_set, "creating scale set extension");
                    self.client
                        .create_or_update(
                            resource_group,
                            scale_set,
                            name,
                            build_extension(&spec.extension, None),
                        )
                        .await
                        .map_err(|e| {
                            e.wrap(
                                "failed to create scale set extension",
                                format!("{name} on {scale_set}"),
                                resource_group,
                            )
                        })?;
                    ExtensionState::InProgress(ProvisioningState::Creating)
                }
                state => state,
            };
            report(self.scope.as_ref(), &state, name, parent)?;
        }
        Ok(())
    }

    async fn delete(&self) -> Result<(), Error> {
        Ok(())
    }
}
