//! A library for generating the two artifacts a newly provisioned worker
//! machine needs to join a running Kubernetes cluster: the node
//! initialization payload ("custom data", consumed by the machine's
//! first-boot provisioning agent) and the provisioning command line ("CSE
//! command") that the platform's extension mechanism executes to unpack and
//! run that payload.
//!
//! The engine is a pure, synchronous computation over immutable inputs: one
//! render call consumes a [`datamodel::ClusterSpec`] snapshot plus resolved
//! reference data and produces two strings. Output is byte-exact, since any
//! deviation in a flag, escape sequence or version-derived constant can
//! produce a node that fails to join the cluster; everything that reaches
//! the output flows through deterministic, ordered structures.
//!
//! # Example
//!
//! ```no_run
//! use nodebaker::{Baker, NodeBootstrapConfig};
//! # fn example(cluster: &datamodel::ClusterSpec) -> Result<(), nodebaker::Error> {
//! let cloud = datamodel::azure_public_cloud_spec();
//! let baker = Baker::new();
//! let components = baker.resolve_components(
//!     "1.18.2",
//!     &cloud,
//!     cluster.properties.orchestrator_profile.kubernetes_config.as_ref(),
//! )?;
//!
//! let config = NodeBootstrapConfig {
//!     cluster,
//!     cloud: &cloud,
//!     agent_pool: &cluster.properties.agent_pool_profiles[0],
//!     components,
//!     tenant_id: "tenantID".to_owned(),
//!     subscription_id: "subID".to_owned(),
//!     resource_group: "resourceGroupName".to_owned(),
//!     user_assigned_identity_client_id: "userAssignedID".to_owned(),
//!     config_gpu_driver_if_needed: true,
//!     enable_gpu_device_plugin_if_needed: false,
//!     enable_dynamic_kubelet: false,
//!     enable_nvidia: false,
//! };
//!
//! let custom_data = baker.bootstrap_payload(&config)?;
//! let cse_command = baker.bootstrap_command(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod addons;
mod baker;
pub mod components;
mod context;
mod error;
pub mod flags;
mod payload;
pub mod template;

pub use baker::{Baker, NodeBootstrapConfig};
pub use components::K8sComponents;
pub use context::ContextError;
pub use error::Error;
