//! The public entry point tying resolution, merging, composition, rendering
//! and packaging together.

use log::info;

use datamodel::{AgentPoolProfile, CloudSpecConfig, ClusterSpec, KubernetesConfig, OsType};

use crate::addons;
use crate::components::{self, ComponentTable, K8sComponents, DEFAULT_COMPONENT_TABLE};
use crate::context::RenderContext;
use crate::payload;
use crate::template::substitute;
use crate::Error;

/// Everything one node bootstrap render consumes.
///
/// The cluster tree, cloud endpoint configuration and component references
/// are supplied by the caller and treated as an immutable snapshot; the
/// booleans are render-time decisions that belong to the caller rather than
/// the cluster description.
pub struct NodeBootstrapConfig<'a> {
    /// The cluster description.
    pub cluster: &'a ClusterSpec,
    /// The cloud environment endpoints.
    pub cloud: &'a CloudSpecConfig,
    /// The agent pool the node belongs to.
    pub agent_pool: &'a AgentPoolProfile,
    /// Pre-resolved component references for the orchestrator version.
    pub components: K8sComponents,
    /// The AAD tenant the node authenticates against.
    pub tenant_id: String,
    /// The subscription the node's resources live in.
    pub subscription_id: String,
    /// The resource group the node's resources live in.
    pub resource_group: String,
    /// The client id of the user-assigned identity, when one is attached.
    pub user_assigned_identity_client_id: String,
    /// Whether GPU drivers should be installed when the node has a GPU.
    pub config_gpu_driver_if_needed: bool,
    /// Whether the GPU device plugin should be scheduled when the node has a
    /// GPU.
    pub enable_gpu_device_plugin_if_needed: bool,
    /// Whether the kubelet dynamic configuration directory is set up.
    pub enable_dynamic_kubelet: bool,
    /// Whether this node is a GPU node.
    pub enable_nvidia: bool,
}

/// Generates node bootstrap artifacts from a cluster description.
///
/// A `Baker` holds only immutable reference data (the version→component
/// table), loaded once and injected rather than read from ambient global
/// state, so tests can substitute fixture tables. Renders are pure and
/// independent; concurrent calls need no coordination.
pub struct Baker {
    component_table: ComponentTable,
}

impl Baker {
    /// Creates a baker backed by the built-in component table.
    pub fn new() -> Self {
        Baker {
            component_table: DEFAULT_COMPONENT_TABLE.clone(),
        }
    }

    /// Creates a baker backed by the given component table.
    pub fn with_component_table(component_table: ComponentTable) -> Self {
        Baker { component_table }
    }

    /// Resolves the component references for an orchestrator version; see
    /// [`components::resolve`].
    pub fn resolve_components(
        &self,
        version: &str,
        cloud: &CloudSpecConfig,
        kubernetes_config: Option<&KubernetesConfig>,
    ) -> Result<K8sComponents, Error> {
        Ok(components::resolve(
            &self.component_table,
            version,
            cloud,
            kubernetes_config,
        )?)
    }

    /// Renders the node initialization payload ("custom data").
    ///
    /// Deterministic: identical inputs always produce identical bytes.
    pub fn bootstrap_payload(&self, config: &NodeBootstrapConfig<'_>) -> Result<String, Error> {
        let context = RenderContext::build(config)?;
        let blocks = addons::compose(&context)?;
        let script = substitute(
            context.bundle.skeleton,
            context.bundle.name,
            &blocks,
            &context.scalars,
        )?;
        info!(
            "rendered bootstrap script for pool {} with bundle {}",
            config.agent_pool.name, context.bundle.name
        );
        match context.os_type {
            OsType::Linux => Ok(payload::encode_linux_custom_data(&script, context.bundle.name)?),
            OsType::Windows => Ok(payload::encode_windows_custom_data(&script)),
        }
    }

    /// Renders the provisioning command line ("CSE command") that unpacks
    /// and executes the custom data on first boot.
    pub fn bootstrap_command(&self, config: &NodeBootstrapConfig<'_>) -> Result<String, Error> {
        let context = RenderContext::build(config)?;
        match context.os_type {
            OsType::Linux => {
                Ok(payload::linux_cse_command(context.bundle.name, &context.scalars)?)
            }
            OsType::Windows => {
                Ok(payload::windows_cse_command(context.bundle.name, &context.scalars)?)
            }
        }
    }
}

impl Default for Baker {
    fn default() -> Self {
        Self::new()
    }
}
