//! Azure Resource Manager request/response payloads
//!
//! Only the fields the reconcilers read or write are modelled; unknown
//! fields in responses are ignored.

use serde::{Deserialize, Serialize};

use super::types::ProvisioningState;

/// Public IP SKU name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicIpSkuName {
    /// Basic SKU
    Basic,
    /// Standard SKU
    Standard,
}

/// Public IP SKU
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpSku {
    /// SKU name
    pub name: PublicIpSkuName,
}

/// IP address version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4
    IPv4,
    /// IPv6
    IPv6,
}

/// IP allocation method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpAllocationMethod {
    /// Address is fixed for the lifetime of the resource
    Static,
    /// Address is assigned on attach
    Dynamic,
}

/// DNS settings of a public IP
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpDnsSettings {
    /// Label combined with the regional zone to form the FQDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<String>,
    /// Fully-qualified domain name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// Properties of a public IP
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpProperties {
    /// Address version
    #[serde(rename = "publicIPAddressVersion")]
    pub public_ip_address_version: IpVersion,
    /// Allocation method
    #[serde(rename = "publicIPAllocationMethod")]
    pub public_ip_allocation_method: IpAllocationMethod,
    /// DNS settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<PublicIpDnsSettings>,
    /// Allocated address (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Provisioning state (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A public IP address resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpAddress {
    /// Resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Azure region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// SKU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<PublicIpSku>,
    /// Properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PublicIpProperties>,
}

/// Properties of a VM or scale set extension
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProperties {
    /// Extension publisher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Extension type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Type handler version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_handler_version: Option<String>,
    /// Public settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
    /// Protected settings (never returned by the provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_settings: Option<serde_json::Value>,
    /// Provisioning state (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A VM or scale set extension resource
///
/// Both resource types share the same shape; scale set extensions carry no
/// location of their own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachineExtension {
    /// Resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Azure region (VM extensions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ExtensionProperties>,
}

impl VirtualMachineExtension {
    /// Provisioning state reported by the provider, if any
    pub fn provisioning_state(&self) -> Option<&ProvisioningState> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_ref())
    }
}

/// ARM error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
