//! Client traits for the Azure resources the reconcilers manage
//!
//! Provides a trait-based abstraction over the provider API, allowing tests to
//! mock Azure interactions while production code uses [`super::ArmClient`].

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::models::{PublicIpAddress, VirtualMachineExtension};
use crate::Error;

/// Operations on public IP addresses
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PublicIpClient: Send + Sync {
    /// Create or update a public IP address
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        ip: PublicIpAddress,
    ) -> Result<(), Error>;

    /// Delete a public IP address
    ///
    /// Returns a not-found error if the address does not exist.
    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), Error>;
}

/// Operations on extensions attached to a single virtual machine
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VmExtensionClient: Send + Sync {
    /// Get an extension
    ///
    /// Returns a not-found error if the extension does not exist.
    async fn get(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
    ) -> Result<VirtualMachineExtension, Error>;

    /// Create or update an extension
    async fn create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
        extension: VirtualMachineExtension,
    ) -> Result<(), Error>;
}

/// Operations on extensions attached to a virtual machine scale set
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VmssExtensionClient: Send + Sync {
    /// Get an extension
    ///
    /// Returns a not-found error if the extension does not exist.
    async fn get(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        name: &str,
    ) -> Result<VirtualMachineExtension, Error>;

    /// Create or update an extension
    async fn create_or_update(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        name: &str,
        extension: VirtualMachineExtension,
    ) -> Result<(), Error>;
}
