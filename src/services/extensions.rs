//! Provisioning-state handling shared by the VM and scale set extension services

use std::fmt;

use tracing::{debug, debug_span, info};

use crate::azure::{ExtensionProperties, ExtensionSpec, ProvisioningState, VirtualMachineExtension};
use crate::crd::{
    Condition, ConditionSeverity, BOOTSTRAP_FAILED_REASON, BOOTSTRAP_IN_PROGRESS_REASON,
    BOOTSTRAP_SUCCEEDED_CONDITION,
};
use crate::scope::ConditionSetter;
use crate::Error;

/// Resource an extension is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Parent<'a> {
    /// A single virtual machine
    Vm(&'a str),
    /// A virtual machine scale set
    ScaleSet(&'a str),
}

impl Parent<'_> {
    fn name(&self) -> &str {
        match self {
            Parent::Vm(name) | Parent::ScaleSet(name) => name,
        }
    }
}

impl fmt::Display for Parent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the provider reported for an extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ExtensionState {
    /// The extension does not exist yet
    Absent,
    /// Provisioning finished successfully
    Succeeded,
    /// Provisioning is still running (creating, updating, or an unknown state)
    InProgress(ProvisioningState),
    /// Provisioning ended in a state the provider will not leave on its own
    Failed(ProvisioningState),
}

/// Classify the result of a GET on an extension
///
/// Not-found maps to [`ExtensionState::Absent`]; any other error is returned
/// wrapped with the extension and parent names.
pub(crate) fn observe(
    existing: Result<VirtualMachineExtension, Error>,
    extension: &str,
    parent: Parent<'_>,
    resource_group: &str,
) -> Result<ExtensionState, Error> {
    let existing = match existing {
        Ok(existing) => existing,
        Err(e) if e.is_not_found() => return Ok(ExtensionState::Absent),
        Err(e) => {
            return Err(e.wrap(
                "failed to get extension",
                format!("{extension} on {parent}"),
                resource_group,
            ))
        }
    };

    let state = existing
        .provisioning_state()
        .cloned()
        .unwrap_or_else(|| ProvisioningState::Other(String::new()));

    Ok(if state.is_succeeded() {
        ExtensionState::Succeeded
    } else if state.is_failed() {
        ExtensionState::Failed(state)
    } else {
        ExtensionState::InProgress(state)
    })
}

/// Record the bootstrap condition for an existing extension
///
/// Succeeded returns `Ok`; in-progress returns a retryable error and failed a
/// terminal one, so the caller stops the pass at the first unfinished
/// extension.
pub(crate) fn report<S: ConditionSetter + ?Sized>(
    setter: &S,
    state: &ExtensionState,
    extension: &str,
    parent: Parent<'_>,
) -> Result<(), Error> {
    let span = match parent {
        Parent::Vm(vm) => debug_span!("extension", vm_extension = extension, vm),
        Parent::ScaleSet(scale_set) => {
            debug_span!("extension", vm_extension = extension, scale_set)
        }
    };
    let _entered = span.enter();

    match state {
        ExtensionState::Absent => Ok(()),
        ExtensionState::Succeeded => {
            debug!("extension provisioning state is succeeded");
            setter.set_condition(Condition::true_condition(BOOTSTRAP_SUCCEEDED_CONDITION));
            Ok(())
        }
        ExtensionState::InProgress(provisioning_state) => {
            debug!(state = %provisioning_state, "extension provisioning state is in progress");
            setter.set_condition(Condition::false_condition(
                BOOTSTRAP_SUCCEEDED_CONDITION,
                BOOTSTRAP_IN_PROGRESS_REASON,
                ConditionSeverity::Info,
                format!("extension {extension} on {parent} is {provisioning_state}"),
            ));
            Err(Error::StillProvisioning {
                extension: extension.to_string(),
                parent: parent.to_string(),
            })
        }
        ExtensionState::Failed(provisioning_state) => {
            info!(state = %provisioning_state, "extension provisioning state is failed");
            setter.set_condition(Condition::false_condition(
                BOOTSTRAP_SUCCEEDED_CONDITION,
                BOOTSTRAP_FAILED_REASON,
                ConditionSeverity::Error,
                format!("extension {extension} on {parent} is {provisioning_state}"),
            ));
            Err(Error::ProvisioningFailed {
                extension: extension.to_string(),
                parent: parent.to_string(),
                state: provisioning_state.to_string(),
            })
        }
    }
}

/// Build the create payload for an extension spec
pub(crate) fn build_extension(
    spec: &ExtensionSpec,
    location: Option<&str>,
) -> VirtualMachineExtension {
    VirtualMachineExtension {
        name: Some(spec.name.clone()),
        location: location.map(str::to_string),
        properties: Some(ExtensionProperties {
            publisher: Some(spec.publisher.clone()),
            type_: Some(spec.extension_type.clone()),
            type_handler_version: Some(spec.version.clone()),
            settings: None,
            protected_settings: spec.protected_settings.clone(),
            provisioning_state: None,
        }),
    }
}
