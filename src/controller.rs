//! Maps reconcile outcomes to requeue decisions
//!
//! The services only report what happened; whether and when to look again is
//! decided here, in the shape the kube-runtime controller expects.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use tracing::{error, info, instrument, warn};

use crate::services::{delete_services, reconcile_services, Service};
use crate::Error;

/// Requeue delay while something is still converging
pub const RETRY_INTERVAL: Duration = Duration::from_secs(15);

/// Requeue delay after a terminal failure
pub const FAILURE_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic re-validation once everything has converged
pub const RESYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Decide when to retry after a failed pass
pub fn error_policy(error: &Error) -> Action {
    if error.is_retryable() {
        warn!(%error, "reconciliation not finished, will retry");
        Action::requeue(RETRY_INTERVAL)
    } else {
        error!(?error, "reconciliation failed");
        Action::requeue(FAILURE_INTERVAL)
    }
}

/// Action after a pass where every service converged
pub fn success_action() -> Action {
    Action::requeue(RESYNC_INTERVAL)
}

/// Run one reconcile pass over the services and map the result to an action
#[instrument(skip_all)]
pub async fn run_pass(services: &[Arc<dyn Service>]) -> Action {
    match reconcile_services(services).await {
        Ok(()) => {
            info!("all services reconciled");
            success_action()
        }
        Err(e) => error_policy(&e),
    }
}

/// Run one delete pass over the services
///
/// `None` means every service finished deleting; otherwise the returned action
/// says when to try again.
#[instrument(skip_all)]
pub async fn run_delete_pass(services: &[Arc<dyn Service>]) -> Option<Action> {
    match delete_services(services).await {
        Ok(()) => {
            info!("all services deleted");
            None
        }
        Err(e) => Some(error_policy(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::{MockPublicIpClient, MockVmExtensionClient, PublicIpSpec};
    use crate::azure::{
        ExtensionProperties, ExtensionSpec, ProvisioningState, VirtualMachineExtension,
        VmExtensionSpec,
    };
    use crate::scope::ClusterScope;
    use crate::services::{PublicIpService, VmExtensionService};

    fn cluster_scope() -> Arc<ClusterScope> {
        Arc::new(
            ClusterScope::new("mycluster", "my-rg", "eastus")
                .with_public_ip(PublicIpSpec::new("mycluster-api", "api.example.com"))
                .with_vm_extension(VmExtensionSpec::new(
                    "mycluster-cp-0",
                    ExtensionSpec::new("boot", "Microsoft.Azure", "CustomScript", "2.1"),
                )),
        )
    }

    fn vm_client_reporting(state: &'static str) -> MockVmExtensionClient {
        let mut client = MockVmExtensionClient::new();
        client.expect_get().returning(move |_, _, _| {
            Ok(VirtualMachineExtension {
                properties: Some(ExtensionProperties {
                    provisioning_state: Some(ProvisioningState::from(state)),
                    ..Default::default()
                }),
                ..Default::default()
            })
        });
        client
    }

    fn services(state: &'static str) -> Vec<Arc<dyn Service>> {
        let scope = cluster_scope();
        let mut ips = MockPublicIpClient::new();
        ips.expect_create_or_update().returning(|_, _, _| Ok(()));
        ips.expect_delete().returning(|_, _| Ok(()));

        vec![
            Arc::new(PublicIpService::new(scope.clone(), Arc::new(ips))) as Arc<dyn Service>,
            Arc::new(VmExtensionService::new(
                scope,
                Arc::new(vm_client_reporting(state)),
            )) as Arc<dyn Service>,
        ]
    }

    // ==========================================================================
    // Story Tests: Requeue decisions
    // ==========================================================================

    #[test]
    fn story_retryable_errors_requeue_quickly() {
        let err = Error::StillProvisioning {
            extension: "boot".to_string(),
            parent: "vm".to_string(),
        };
        assert_eq!(error_policy(&err), Action::requeue(RETRY_INTERVAL));
        assert_eq!(
            error_policy(&Error::api(429, "TooManyRequests", "slow down")),
            Action::requeue(RETRY_INTERVAL)
        );
    }

    #[test]
    fn story_terminal_errors_back_off() {
        let err = Error::ProvisioningFailed {
            extension: "boot".to_string(),
            parent: "vm".to_string(),
            state: "Failed".to_string(),
        };
        assert_eq!(error_policy(&err), Action::requeue(FAILURE_INTERVAL));
        assert_eq!(
            error_policy(&Error::config("no subscription")),
            Action::requeue(FAILURE_INTERVAL)
        );
    }

    /// Story: the public IP exists and the bootstrap extension succeeded, so
    /// the cluster is only re-checked on the resync interval
    #[tokio::test]
    async fn story_converged_pass_resyncs() {
        let action = run_pass(&services("Succeeded")).await;
        assert_eq!(action, success_action());
    }

    #[tokio::test]
    async fn story_provisioning_pass_retries_soon() {
        let action = run_pass(&services("Creating")).await;
        assert_eq!(action, Action::requeue(RETRY_INTERVAL));
    }

    #[tokio::test]
    async fn story_failed_extension_backs_off() {
        let action = run_pass(&services("Failed")).await;
        assert_eq!(action, Action::requeue(FAILURE_INTERVAL));
    }

    #[tokio::test]
    async fn story_delete_pass_completes() {
        assert!(run_delete_pass(&services("Succeeded")).await.is_none());
    }

    #[tokio::test]
    async fn story_delete_pass_retries_on_throttling() {
        let scope = cluster_scope();
        let mut ips = MockPublicIpClient::new();
        ips.expect_delete()
            .returning(|_, _| Err(Error::api(429, "TooManyRequests", "slow down")));
        let services =
            vec![Arc::new(PublicIpService::new(scope, Arc::new(ips))) as Arc<dyn Service>];

        assert_eq!(
            run_delete_pass(&services).await,
            Some(Action::requeue(RETRY_INTERVAL))
        );
    }
}
