//! Environment configuration for the Azure clients
//!
//! Provides trait-based access to environment configuration,
//! enabling dependency injection and mocking for tests.

use std::time::Duration;

use crate::Error;

/// Public Azure cloud Resource Manager endpoint
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com";

/// API version used for `Microsoft.Network` resources
pub const NETWORK_API_VERSION: &str = "2019-06-01";

/// API version used for `Microsoft.Compute` resources
pub const COMPUTE_API_VERSION: &str = "2020-06-30";

/// Default timeout for a single Resource Manager request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for reading Azure configuration from the environment
///
/// This abstracts reading from environment variables, enabling
/// proper unit testing without manipulating global state.
#[cfg_attr(test, mockall::automock)]
pub trait AzureEnvConfig: Send + Sync {
    /// Subscription that owns the cluster's resources (`AZURE_SUBSCRIPTION_ID`)
    fn subscription_id(&self) -> Option<String>;

    /// Resource Manager endpoint override (`AZURE_RESOURCE_MANAGER_ENDPOINT`)
    fn resource_manager_endpoint(&self) -> Option<String>;

    /// Pre-acquired bearer token (`AZURE_ACCESS_TOKEN`)
    fn access_token(&self) -> Option<String>;
}

/// Default implementation that reads from environment variables
#[derive(Clone, Default)]
pub struct OsEnvConfig;

impl AzureEnvConfig for OsEnvConfig {
    fn subscription_id(&self) -> Option<String> {
        std::env::var("AZURE_SUBSCRIPTION_ID").ok()
    }

    fn resource_manager_endpoint(&self) -> Option<String> {
        std::env::var("AZURE_RESOURCE_MANAGER_ENDPOINT").ok()
    }

    fn access_token(&self) -> Option<String> {
        std::env::var("AZURE_ACCESS_TOKEN").ok()
    }
}

/// Connection settings for Azure Resource Manager
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AzureConfig {
    /// Subscription that owns the cluster's resources
    pub subscription_id: String,
    /// Resource Manager base URL, without a trailing slash
    pub resource_manager_endpoint: String,
    /// Timeout for a single request
    pub request_timeout: Duration,
}

impl AzureConfig {
    /// Create a config for the public cloud endpoint
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_manager_endpoint: DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the Resource Manager endpoint (sovereign clouds, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.resource_manager_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build and validate a config from the environment
    pub fn from_env(env: &dyn AzureEnvConfig) -> Result<Self, Error> {
        let subscription_id = env
            .subscription_id()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::config("AZURE_SUBSCRIPTION_ID is not set"))?;

        let mut config = Self::new(subscription_id);
        if let Some(endpoint) = env.resource_manager_endpoint() {
            config = config.with_endpoint(endpoint);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<(), Error> {
        if self.subscription_id.is_empty() {
            return Err(Error::config("subscription id must not be empty"));
        }
        if !self.resource_manager_endpoint.starts_with("https://")
            && !self.resource_manager_endpoint.starts_with("http://")
        {
            return Err(Error::config(format!(
                "resource manager endpoint must be an http(s) URL, got {}",
                self.resource_manager_endpoint
            )));
        }
        Ok(())
    }
}
