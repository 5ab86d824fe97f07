//! Azure services reconciled on every controller pass
//!
//! Each service converges one resource type toward the specs in its scope.
//! Services never retry on their own: they return a retryable error and rely
//! on the enclosing controller to call them again.

mod extensions;
pub mod publicips;
pub mod vmextensions;
pub mod vmssextensions;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::Error;

pub use publicips::PublicIpService;
pub use vmextensions::VmExtensionService;
pub use vmssextensions::VmssExtensionService;

/// A reconcilable Azure resource type
#[async_trait]
pub trait Service: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Converge live state toward the desired specs
    async fn reconcile(&self) -> Result<(), Error>;

    /// Remove the resources this service owns
    async fn delete(&self) -> Result<(), Error>;
}

/// Reconcile services in order, stopping at the first error
pub async fn reconcile_services(services: &[Arc<dyn Service>]) -> Result<(), Error> {
    for service in services {
        debug!(service = service.name(), "reconciling service");
        service.reconcile().await?;
    }
    Ok(())
}

/// Delete services in reverse order, stopping at the first error
pub async fn delete_services(services: &[Arc<dyn Service>]) -> Result<(), Error> {
    for service in services.iter().rev() {
        debug!(service = service.name(), "deleting service");
        service.delete().await?;
    }
    Ok(())
}
