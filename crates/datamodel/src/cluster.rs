use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distro::{AvailabilityProfile, ContainerRuntime, Distro, OsType};

/// The key under `containerRuntimeConfig` that relocates container storage
/// (image layers and container state) onto another disk, typically the VM's
/// temp disk.
pub const CONTAINER_DATA_DIR_KEY: &str = "dataDir";

/// The top-level description of a managed cluster, owned by the caller and
/// immutable for the duration of one render.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// The cloud region the cluster lives in.
    pub location: String,
    /// The resource type identifier of the cluster.
    #[serde(rename = "type")]
    pub kind: String,
    /// The nested cluster profiles.
    pub properties: Properties,
}

/// The nested profiles of a [`ClusterSpec`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    /// Orchestrator identity and configuration.
    pub orchestrator_profile: OrchestratorProfile,
    /// The hosted control plane this node will join.
    pub hosted_master_profile: HostedMasterProfile,
    /// The worker node pools of the cluster.
    pub agent_pool_profiles: Vec<AgentPoolProfile>,
    /// Linux administrator account and SSH material.
    pub linux_profile: Option<LinuxProfile>,
    /// Windows administrator account, present only for clusters with Windows
    /// pools.
    pub windows_profile: Option<WindowsProfile>,
    /// The service principal the node uses to talk to the cloud.
    pub service_principal_profile: Option<ServicePrincipalProfile>,
}

/// Orchestrator identity: kind, semantic version and Kubernetes settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorProfile {
    /// The orchestrator kind, e.g. `Kubernetes`.
    pub orchestrator_type: String,
    /// The orchestrator semantic version, e.g. `1.15.7`. Compare through
    /// [`KubernetesVersion`](crate::KubernetesVersion), never as a string.
    pub orchestrator_version: String,
    /// Cluster-level Kubernetes configuration.
    pub kubernetes_config: Option<KubernetesConfig>,
}

/// Kubernetes settings, present at cluster level and optionally overridden
/// per agent pool. Pool-level settings take precedence key-wise.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesConfig {
    /// Kubelet command-line flags, including the composite
    /// `--feature-gates` entry. A `BTreeMap` so that iteration order, and
    /// with it rendered output, stays deterministic.
    pub kubelet_config: Option<BTreeMap<String, String>>,
    /// The container runtime for nodes using this configuration.
    pub container_runtime: Option<ContainerRuntime>,
    /// Runtime tuning knobs; see [`CONTAINER_DATA_DIR_KEY`].
    pub container_runtime_config: Option<BTreeMap<String, String>>,
    /// Replaces the resolved main orchestrator-binary image when non-empty.
    pub custom_hyperkube_image: Option<String>,
    /// Overrides the cloud's default upstream image base path.
    pub kubernetes_image_base: Option<String>,
    /// Overrides the cloud's default mirror image base path.
    pub mcr_kubernetes_image_base: Option<String>,
    /// Private-cluster settings.
    pub private_cluster: Option<PrivateCluster>,
}

impl KubernetesConfig {
    /// The configured container data directory, if any.
    pub fn data_dir(&self) -> Option<&str> {
        self.container_runtime_config
            .as_ref()
            .and_then(|config| config.get(CONTAINER_DATA_DIR_KEY))
            .map(|dir| dir.as_str())
    }
}

/// Settings for clusters whose API server is not publicly resolvable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCluster {
    /// Whether the cluster is private.
    pub enabled: Option<bool>,
    /// Whether nodes run the hosts-config agent that maintains API server
    /// name resolution. Unset behaves as disabled.
    pub enable_hosts_config_agent: Option<bool>,
}

impl PrivateCluster {
    /// Whether the hosts-config agent is explicitly enabled.
    pub fn hosts_config_agent_enabled(&self) -> bool {
        self.enable_hosts_config_agent.unwrap_or(false)
    }
}

/// The hosted control plane endpoint identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedMasterProfile {
    /// The DNS prefix from which the API server FQDN is derived.
    pub dns_prefix: String,
}

/// One homogeneously configured pool of worker nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    /// The pool name.
    pub name: String,
    /// The number of nodes in the pool.
    pub count: u32,
    /// The VM size nodes in this pool are provisioned with.
    pub vm_size: String,
    /// The storage profile, e.g. `ManagedDisks`.
    pub storage_profile: String,
    /// The operating system family of the pool.
    pub os_type: OsType,
    /// The base image the pool's nodes boot from.
    pub distro: Distro,
    /// The subnet the pool's NICs attach to.
    #[serde(rename = "vnetSubnetID")]
    pub vnet_subnet_id: String,
    /// How the pool's VMs are grouped.
    pub availability_profile: AvailabilityProfile,
    /// Pool-level Kubernetes overrides; keys set here win over the
    /// cluster-level configuration.
    pub kubernetes_config: Option<KubernetesConfig>,
}

impl AgentPoolProfile {
    /// Whether this pool provisions Windows nodes.
    pub fn is_windows(&self) -> bool {
        self.os_type == OsType::Windows
    }
}

/// The Linux administrator account and SSH material for the cluster's nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinuxProfile {
    /// The administrator login name.
    pub admin_username: String,
    /// SSH access configuration.
    pub ssh: SshConfig,
}

/// SSH access configuration for Linux nodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConfig {
    /// The public keys installed for the administrator account.
    pub public_keys: Vec<PublicKey>,
}

/// One SSH public key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    /// The key material in OpenSSH public key format.
    pub key_data: String,
}

/// The Windows administrator account for the cluster's Windows nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsProfile {
    /// The administrator login name.
    pub admin_username: String,
    /// The administrator password.
    pub admin_password: String,
}

/// The service principal nodes use to authenticate to the cloud.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalProfile {
    /// The application (client) identifier.
    pub client_id: String,
    /// The client secret.
    pub secret: String,
}
