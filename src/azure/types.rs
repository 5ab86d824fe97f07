//! Desired specs and observed provisioning state for Azure resources

use serde::{Deserialize, Serialize};

/// Provisioning state reported by Azure Resource Manager
///
/// ARM reports this as a free-form string; well-known values map onto
/// variants and anything else is kept verbatim in [`ProvisioningState::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningState {
    /// Resource is being created
    Creating,
    /// Resource is being updated
    Updating,
    /// Resource is being deleted
    Deleting,
    /// Last operation on the resource succeeded
    Succeeded,
    /// Last operation on the resource failed
    Failed,
    /// Last operation on the resource was canceled
    Canceled,
    /// Any other state string
    Other(String),
}

impl ProvisioningState {
    /// Returns true if the resource reached Succeeded
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true if the resource reached a state it will not leave on its own
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::Canceled)
    }
}

impl From<&str> for ProvisioningState {
    fn from(s: &str) -> Self {
        match s {
            "Creating" => Self::Creating,
            "Updating" => Self::Updating,
            "Deleting" => Self::Deleting,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ProvisioningState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ProvisioningState> for String {
    fn from(state: ProvisioningState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creating => write!(f, "Creating"),
            Self::Updating => write!(f, "Updating"),
            Self::Deleting => write!(f, "Deleting"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Desired public IP address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicIpSpec {
    /// Name of the public IP resource
    pub name: String,
    /// Fully-qualified DNS name to publish for the address
    pub dns_name: String,
}

impl PublicIpSpec {
    /// Create a new public IP spec
    pub fn new(name: impl Into<String>, dns_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dns_name: dns_name.into(),
        }
    }

    /// DNS label for the address, derived from the resource name
    ///
    /// Azure DNS labels must be lowercase.
    pub fn dns_label(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Desired VM or scale set extension, independent of where it is attached
#[derive(Clone, PartialEq)]
pub struct ExtensionSpec {
    /// Extension resource name
    pub name: String,
    /// Extension publisher (e.g., "Microsoft.Azure.ContainerUpstream")
    pub publisher: String,
    /// Extension type (e.g., "CAPZ.Linux.Bootstrapping")
    pub extension_type: String,
    /// Type handler version (e.g., "1.0")
    pub version: String,
    /// Opaque protected settings payload, passed through to the provider
    pub protected_settings: Option<serde_json::Value>,
}

impl ExtensionSpec {
    /// Create an extension spec without protected settings
    pub fn new(
        name: impl Into<String>,
        publisher: impl Into<String>,
        extension_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            publisher: publisher.into(),
            extension_type: extension_type.into(),
            version: version.into(),
            protected_settings: None,
        }
    }

    /// Attach protected settings
    pub fn with_protected_settings(mut self, settings: serde_json::Value) -> Self {
        self.protected_settings = Some(settings);
        self
    }
}

// Protected settings routinely carry secrets; keep them out of logs.
impl std::fmt::Debug for ExtensionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionSpec")
            .field("name", &self.name)
            .field("publisher", &self.publisher)
            .field("extension_type", &self.extension_type)
            .field("version", &self.version)
            .field(
                "protected_settings",
                &self.protected_settings.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Extension attached to a single virtual machine
#[derive(Clone, Debug, PartialEq)]
pub struct VmExtensionSpec {
    /// Name of the VM the extension belongs to
    pub vm_name: String,
    /// The extension itself
    pub extension: ExtensionSpec,
}

impl VmExtensionSpec {
    /// Create a VM extension spec
    pub fn new(vm_name: impl Into<String>, extension: ExtensionSpec) -> Self {
        Self {
            vm_name: vm_name.into(),
            extension,
        }
    }
}

/// Extension attached to a virtual machine scale set
#[derive(Clone, Debug, PartialEq)]
pub struct VmssExtensionSpec {
    /// Name of the scale set the extension belongs to
    pub scale_set_name: String,
    /// The extension itself
    pub extension: ExtensionSpec,
}

impl VmssExtensionSpec {
    /// Create a scale set extension spec
    pub fn new(scale_set_name: impl Into<String>, extension: ExtensionSpec) -> Self {
        Self {
            scale_set_name: scale_set_name.into(),
            extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_state_parses_known_values() {
        assert_eq!(ProvisioningState::from("Creating"), ProvisioningState::Creating);
        assert_eq!(
            ProvisioningState::from("Succeeded"),
            ProvisioningState::Succeeded
        );
        assert_eq!(ProvisioningState::from("Failed"), ProvisioningState::Failed);
        assert_eq!(
            ProvisioningState::from("Migrating"),
            ProvisioningState::Other("Migrating".to_string())
        );
    }

    #[test]
    fn test_provisioning_state_classification() {
        assert!(ProvisioningState::Succeeded.is_succeeded());
        assert!(ProvisioningState::Failed.is_failed());
        assert!(ProvisioningState::Canceled.is_failed());
        assert!(!ProvisioningState::Creating.is_failed());
        assert!(!ProvisioningState::Updating.is_succeeded());
    }

    #[test]
    fn test_provisioning_state_serde_uses_plain_strings() {
        let state: ProvisioningState = serde_json::from_str("\"Updating\"").unwrap();
        assert_eq!(state, ProvisioningState::Updating);

        let json = serde_json::to_string(&ProvisioningState::Other("Weird".into())).unwrap();
        assert_eq!(json, "\"Weird\"");
    }

    #[test]
    fn test_dns_label_is_lowercase_name() {
        let spec = PublicIpSpec::new("MyCluster-APIServer", "mycluster.eastus.cloudapp.azure.com");
        assert_eq!(spec.dns_label(), "mycluster-apiserver");
    }

    #[test]
    fn test_extension_debug_redacts_protected_settings() {
        let spec = ExtensionSpec::new("boot", "Microsoft.Azure", "CustomScript", "2.1")
            .with_protected_settings(serde_json::json!({"commandToExecute": "secret"}));
        let debug = format!("{spec:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret"));
    }
}
