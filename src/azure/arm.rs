//! Azure Resource Manager REST client
//!
//! Implements the client traits with plain HTTP calls against ARM. Writes are
//! issued as PUT/DELETE and not polled to completion: the next reconcile pass
//! observes the resulting provisioning state instead.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::client::{PublicIpClient, VmExtensionClient, VmssExtensionClient};
use super::models::{ErrorResponse, PublicIpAddress, VirtualMachineExtension};
use crate::config::{AzureConfig, AzureEnvConfig, COMPUTE_API_VERSION, NETWORK_API_VERSION};
use crate::Error;

/// Source of bearer tokens for Resource Manager requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for the Resource Manager audience
    async fn token(&self) -> Result<String, Error>;
}

/// Token provider that always returns the same pre-acquired token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Create a provider for a pre-acquired token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, Error> {
        if self.token.is_empty() {
            return Err(Error::auth("static access token is empty"));
        }
        Ok(self.token.clone())
    }
}

/// Resource Manager client for public IPs and VM/VMSS extensions
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    config: AzureConfig,
    token: Arc<dyn TokenProvider>,
}

impl ArmClient {
    /// Create a client from explicit configuration and a token source
    pub fn new(config: AzureConfig, token: Arc<dyn TokenProvider>) -> Result<Self, Error> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            token,
        })
    }

    /// Create a client from the environment, using `AZURE_ACCESS_TOKEN` as a static token
    pub fn from_env(env: &dyn AzureEnvConfig) -> Result<Self, Error> {
        let config = AzureConfig::from_env(env)?;
        let token = env
            .access_token()
            .ok_or_else(|| Error::config("AZURE_ACCESS_TOKEN is not set"))?;
        Self::new(config, Arc::new(StaticTokenProvider::new(token)))
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Full URL of a resource under a resource group
    ///
    /// `provider_path` holds the segments after `/providers/`, e.g.
    /// `["Microsoft.Network", "publicIPAddresses", "my-ip"]`. Every segment is
    /// percent-encoded, so a name cannot add path segments or a query.
    fn resource_url(&self, resource_group: &str, provider_path: &[&str]) -> Result<Url, Error> {
        let endpoint = &self.config.resource_manager_endpoint;
        let mut url = Url::parse(endpoint).map_err(|e| {
            Error::config(format!("invalid resource manager endpoint {endpoint}: {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::config(format!("resource manager endpoint {endpoint} is not a base URL"))
            })?
            .pop_if_empty()
            .extend([
                "subscriptions",
                self.config.subscription_id.as_str(),
                "resourceGroups",
                resource_group,
                "providers",
            ])
            .extend(provider_path);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, api_version: &str) -> Result<T, Error> {
        let token = self.token.token().await?;
        let response = self
            .http
            .get(url.clone())
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_response(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::serialization(format!("invalid response from {url}: {e}")))
    }

    async fn put_json<T: Serialize>(
        &self,
        url: Url,
        api_version: &str,
        body: &T,
    ) -> Result<(), Error> {
        let token = self.token.token().await?;
        let response = self
            .http
            .put(url.clone())
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let response = check_response(response).await?;
        debug!(%url, status = %response.status(), "PUT accepted");
        Ok(())
    }

    async fn delete_resource(&self, url: Url, api_version: &str) -> Result<(), Error> {
        let token = self.token.token().await?;
        let response = self
            .http
            .delete(url.clone())
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_response(response).await?;
        debug!(%url, status = %response.status(), "DELETE accepted");
        Ok(())
    }
}

/// Turn a non-success response into [`Error::Api`], parsing ARM's error envelope
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse {
            error: Some(detail),
        }) => (detail.code, detail.message),
        _ => (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        ),
    };
    Err(Error::api(status.as_u16(), code, message))
}

#[async_trait]
impl PublicIpClient for ArmClient {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        ip: PublicIpAddress,
    ) -> Result<(), Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Network", "publicIPAddresses", name],
        )?;
        self.put_json(url, NETWORK_API_VERSION, &ip).await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<(), Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Network", "publicIPAddresses", name],
        )?;
        self.delete_resource(url, NETWORK_API_VERSION).await
    }
}

#[async_trait]
impl VmExtensionClient for ArmClient {
    async fn get(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
    ) -> Result<VirtualMachineExtension, Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Compute", "virtualMachines", vm_name, "extensions", name],
        )?;
        self.get_json(url, COMPUTE_API_VERSION).await
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
        extension: VirtualMachineExtension,
    ) -> Result<(), Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Compute", "virtualMachines", vm_name, "extensions", name],
        )?;
        self.put_json(url, COMPUTE_API_VERSION, &extension).await
    }
}

#[async_trait]
impl VmssExtensionClient for ArmClient {
    async fn get(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        name: &str,
    ) -> Result<VirtualMachineExtension, Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Compute", "virtualMachineScaleSets", scale_set_name, "extensions", name],
        )?;
        self.get_json(url, COMPUTE_API_VERSION).await
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        name: &str,
        extension: VirtualMachineExtension,
    ) -> Result<(), Error> {
        let url = self.resource_url(
            resource_group,
            &["Microsoft.Compute", "virtualMachineScaleSets", scale_set_name, "extensions", name],
        )?;
        self.put_json(url, COMPUTE_API_VERSION, &extension).await
    }
}
