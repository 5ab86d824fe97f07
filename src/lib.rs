//! Lattice Azure - public IP and VM/VMSS extension reconcilers
//!
//! Converges Azure resources toward the desired state declared for a cluster,
//! one controller pass at a time. Each pass reads the live provisioning state,
//! then creates, waits, fails, or does nothing. Already-satisfied and
//! already-absent resources are not errors.
//!
//! # Modules
//!
//! - [`azure`] - Resource model, client traits and the Resource Manager client
//! - [`services`] - The reconcilers (public IPs, VM extensions, VMSS extensions)
//! - [`scope`] - What the services read (cluster, specs) and write (conditions)
//! - [`crd`] - Status condition types
//! - [`controller`] - Requeue policy for reconcile outcomes
//! - [`config`] - Azure connection settings from the environment
//! - [`telemetry`] - JSON logging and optional OTLP trace export
//! - [`error`] - Error types and retry classification

#![deny(missing_docs)]

pub mod azure;
pub mod config;
pub mod controller;
pub mod crd;
pub mod error;
pub mod scope;
pub mod services;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
