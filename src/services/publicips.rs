//! Public IP address reconciliation
//!
//! Every desired public IP is created (or updated in place) as a Standard SKU,
//! statically allocated IPv4 address in the cluster's location, published
//! under a DNS label derived from its name. Deleting an address that is
//! already gone counts as success.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::Service;
use crate::azure::{
    IpAllocationMethod, IpVersion, PublicIpAddress, PublicIpClient, PublicIpDnsSettings,
    PublicIpProperties, PublicIpSku, PublicIpSkuName, PublicIpSpec,
};
use crate::scope::PublicIpScope;
use crate::Error;

/// Reconciles the public IPs named by a [`PublicIpScope`]
pub struct PublicIpService {
    scope: Arc<dyn PublicIpScope>,
    client: Arc<dyn PublicIpClient>,
}

impl PublicIpService {
    /// Create a service over the given scope and client
    pub fn new(scope: Arc<dyn PublicIpScope>, client: Arc<dyn PublicIpClient>) -> Self {
        Self { scope, client }
    }

    fn desired(&self, spec: &PublicIpSpec) -> PublicIpAddress {
        PublicIpAddress {
            name: Some(spec.name.clone()),
            location: Some(self.scope.location().to_string()),
            sku: Some(PublicIpSku {
                name: PublicIpSkuName::Standard,
            }),
            properties: Some(PublicIpProperties {
                public_ip_address_version: IpVersion::IPv4,
                public_ip_allocation_method: IpAllocationMethod::Static,
                dns_settings: Some(PublicIpDnsSettings {
                    domain_name_label: Some(spec.dns_label()),
                    fqdn: Some(spec.dns_name.clone()),
                }),
                ip_address: None,
                provisioning_state: None,
            }),
        }
    }
}

#[async_trait]
impl Service for PublicIpService {
    fn name(&self) -> &'static str {
        "publicips"
    }

    #[instrument(
        skip_all,
        name = "publicips.reconcile",
        fields(cluster = %self.scope.cluster_name())
    )]
    async fn reconcile(&self) -> Result<(), Error> {
        let resource_group = self.scope.resource_group();
        for spec in self.scope.public_ip_specs() {
            info!(public_ip = %spec.name, "creating public IP");
            self.client
                .create_or_update(resource_group, &spec.name, self.desired(&spec))
                .await
                .map_err(|e| e.wrap("cannot create public IP", &spec.name, resource_group))?;
            info!(public_ip = %spec.name, "successfully created public IP");
        }
        Ok(())
    }

    #[instrument(
        skip_all,
        name = "publicips.delete",
        fields(cluster = %self.scope.cluster_name())
    )]
    async fn delete(&self) -> Result<(), Error> {
        let resource_group = self.scope.resource_group();
        for spec in self.scope.public_ip_specs() {
            info!(public_ip = %spec.name, "deleting public IP");
            match self.client.delete(resource_group, &spec.name).await {
                Ok(()) => info!(public_ip = %spec.name, "deleted public IP"),
                // Already gone
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    return Err(e.wrap("failed to delete public IP", &spec.name, resource_group))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::MockPublicIpClient;
    use crate::scope::ClusterScope;
    use std::sync::Mutex;

    fn scope_with(ips: &[(&str, &str)]) -> Arc<ClusterScope> {
        let scope = ips
            .iter()
            .fold(ClusterScope::new("mycluster", "my-rg", "eastus"), |s, (name, dns)| {
                s.with_public_ip(PublicIpSpec::new(*name, *dns))
            });
        Arc::new(scope)
    }

    /// Captured create calls as (resource group, name, payload)
    type Created = Arc<Mutex<Vec<(String, String, PublicIpAddress)>>>;

    fn capturing_client(created: &Created) -> MockPublicIpClient {
        let created = created.clone();
        let mut client = MockPublicIpClient::new();
        client
            .expect_create_or_update()
            .returning(move |rg, name, ip| {
                created
                    .lock()
                    .unwrap()
                    .push((rg.to_string(), name.to_string(), ip));
                Ok(())
            });
        client
    }

    // ==========================================================================
    // Story Tests: Creating public IPs
    // ==========================================================================

    /// Story: the API server address is created once with the fixed SKU,
    /// allocation, version and DNS settings
    #[tokio::test]
    async fn story_reconcile_creates_standard_static_ipv4() {
        let created: Created = Arc::new(Mutex::new(Vec::new()));
        let service = PublicIpService::new(
            scope_with(&[("MyCluster-APIServer", "mycluster.eastus.cloudapp.azure.com")]),
            Arc::new(capturing_client(&created)),
        );

        service.reconcile().await.unwrap();

        let created = created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let (rg, name, ip) = &created[0];
        assert_eq!(rg, "my-rg");
        assert_eq!(name, "MyCluster-APIServer");
        assert_eq!(ip.location.as_deref(), Some("eastus"));
        assert_eq!(ip.sku.as_ref().unwrap().name, PublicIpSkuName::Standard);

        let props = ip.properties.as_ref().unwrap();
        assert_eq!(props.public_ip_address_version, IpVersion::IPv4);
        assert_eq!(props.public_ip_allocation_method, IpAllocationMethod::Static);
        let dns = props.dns_settings.as_ref().unwrap();
        assert_eq!(dns.domain_name_label.as_deref(), Some("mycluster-apiserver"));
        assert_eq!(
            dns.fqdn.as_deref(),
            Some("mycluster.eastus.cloudapp.azure.com")
        );
    }

    #[tokio::test]
    async fn story_reconcile_creates_every_spec_in_order() {
        let created: Created = Arc::new(Mutex::new(Vec::new()));
        let service = PublicIpService::new(
            scope_with(&[("a", "a.example.com"), ("b", "b.example.com")]),
            Arc::new(capturing_client(&created)),
        );

        service.reconcile().await.unwrap();

        let names: Vec<_> = created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name, _)| name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn story_no_specs_means_no_calls() {
        let service = PublicIpService::new(
            scope_with(&[]),
            Arc::new(MockPublicIpClient::new()),
        );
        service.reconcile().await.unwrap();
        service.delete().await.unwrap();
    }

    /// Story: a provider failure surfaces with the "cannot create public IP"
    /// context and stops before the next address
    #[tokio::test]
    async fn story_create_failure_is_wrapped_and_stops() {
        let mut client = MockPublicIpClient::new();
        client
            .expect_create_or_update()
            .times(1)
            .returning(|_, _, _| Err(Error::api(400, "InvalidDomainNameLabel", "bad label")));

        let service = PublicIpService::new(
            scope_with(&[("a", "a.example.com"), ("b", "b.example.com")]),
            Arc::new(client),
        );

        let err = service.reconcile().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cannot create public IP"));
        assert!(msg.contains("InvalidDomainNameLabel"));
        assert!(!err.is_retryable());
    }

    // ==========================================================================
    // Story Tests: Deleting public IPs
    // ==========================================================================

    /// Story: deleting an address that was never created (or already removed)
    /// is a success, and the remaining addresses are still deleted
    #[tokio::test]
    async fn story_delete_ignores_missing_addresses() {
        let mut client = MockPublicIpClient::new();
        client
            .expect_delete()
            .times(2)
            .returning(|_, name| match name {
                "gone" => Err(Error::api(404, "ResourceNotFound", "not found")),
                _ => Ok(()),
            });

        let service = PublicIpService::new(
            scope_with(&[("gone", "gone.example.com"), ("live", "live.example.com")]),
            Arc::new(client),
        );

        service.delete().await.unwrap();
    }

    #[tokio::test]
    async fn story_delete_failure_names_address_and_group() {
        let mut client = MockPublicIpClient::new();
        client
            .expect_delete()
            .returning(|_, _| Err(Error::api(409, "InUseByLoadBalancer", "in use")));

        let service = PublicIpService::new(
            scope_with(&[("apiserver", "api.example.com")]),
            Arc::new(client),
        );

        let err = service.delete().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failed to delete public IP"));
        assert!(msg.contains("apiserver"));
        assert!(msg.contains("my-rg"));
        assert!(!err.is_not_found());
    }
}
