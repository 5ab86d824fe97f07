//! Azure resource model and provider clients
//!
//! - [`types`] - desired specs and the provisioning-state enum
//! - [`models`] - ARM request/response payloads
//! - [`client`] - mockable client traits per resource type
//! - [`arm`] - Azure Resource Manager REST implementation

pub mod arm;
pub mod client;
pub mod models;
pub mod types;

pub use arm::{ArmClient, StaticTokenProvider, TokenProvider};
pub use client::{PublicIpClient, VmExtensionClient, VmssExtensionClient};
pub use models::{
    ExtensionProperties, IpAllocationMethod, IpVersion, PublicIpAddress, PublicIpDnsSettings,
    PublicIpProperties, PublicIpSku, PublicIpSkuName, VirtualMachineExtension,
};
pub use types::{ExtensionSpec, ProvisioningState, PublicIpSpec, VmExtensionSpec, VmssExtensionSpec};

#[cfg(test)]
pub use client::{MockPublicIpClient, MockVmExtensionClient, MockVmssExtensionClient};
