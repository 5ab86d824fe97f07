//! Error types for the Azure reconcilers
//!
//! Errors are structured with fields to aid debugging in production.
//! Provider errors keep the HTTP status and ARM error code so callers can
//! tell "not found" apart from real failures, and reconcile outcomes are
//! classified as retryable or terminal for the controller's requeue policy.

use thiserror::Error;

/// ARM error codes that mean the addressed resource does not exist
const NOT_FOUND_CODES: &[&str] = &[
    "ResourceNotFound",
    "NotFound",
    "ResourceGroupNotFound",
    "ParentResourceNotFound",
];

/// ARM error codes for throttling and transient server-side failures
const TRANSIENT_CODES: &[&str] = &[
    "TooManyRequests",
    "RetryableError",
    "InternalServerError",
    "ServiceUnavailable",
];

/// Main error type for Azure reconciliation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error response returned by Azure Resource Manager
    #[error("azure error ({status}) {code}: {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// ARM error code (e.g., "ResourceNotFound")
        code: String,
        /// Human-readable message from the provider
        message: String,
    },

    /// Transport-level failure talking to the provider
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A provider call failed; wraps the underlying error with what was attempted
    #[error("{action} {resource} in resource group {resource_group}: {source}")]
    Operation {
        /// What was being attempted (e.g., "cannot create public IP")
        action: String,
        /// Name of the resource involved
        resource: String,
        /// Resource group the resource lives in
        resource_group: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },

    /// Extension is still being provisioned by the provider
    #[error("extension {extension} on {parent} still provisioning")]
    StillProvisioning {
        /// Extension name
        extension: String,
        /// Parent VM or scale set name
        parent: String,
    },

    /// Extension provisioning ended in a failed state
    #[error("extension {extension} on {parent} state failed ({state})")]
    ProvisioningFailed {
        /// Extension name
        extension: String,
        /// Parent VM or scale set name
        parent: String,
        /// Provisioning state reported by the provider
        state: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to obtain a credential for the provider
    #[error("authentication error: {0}")]
    Auth(String),
}

impl Error {
    /// Create an API error from a status code, ARM error code and message
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wrap this error with context about the attempted operation
    pub fn wrap(
        self,
        action: impl Into<String>,
        resource: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self::Operation {
            action: action.into(),
            resource: resource.into(),
            resource_group: resource_group.into(),
            source: Box::new(self),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error with the given message
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Check if this error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api { status, code, .. } => {
                *status == 404 || NOT_FOUND_CODES.contains(&code.as_str())
            }
            Error::Operation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if the controller should expect a later pass to succeed
    ///
    /// Still-provisioning extensions, throttling, server errors and transport
    /// failures are retryable. Failed provisioning, client errors and
    /// configuration problems are terminal for the pass.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status, code, .. } => {
                *status == 429 || *status >= 500 || TRANSIENT_CODES.contains(&code.as_str())
            }
            Error::Request(_) => true,
            Error::Operation { source, .. } => source.is_retryable(),
            Error::StillProvisioning { .. } => true,
            Error::ProvisioningFailed { .. } => false,
            Error::Serialization(_) => false,
            Error::Config(_) => false,
            Error::Auth(_) => true,
        }
    }
}
