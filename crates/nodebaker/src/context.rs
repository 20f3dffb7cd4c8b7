//! Per-render context construction.
//!
//! A [`RenderContext`] is the union of everything the renderer needs,
//! validated and flattened out of the configuration tree. It is built fresh
//! for every render call and never persisted or shared across calls.

use std::collections::BTreeMap;

use thiserror::Error;

use datamodel::{ContainerRuntime, KubernetesVersion, OsType};

use crate::baker::NodeBootstrapConfig;
use crate::flags::{self, DEFAULT_KUBELET_FLAGS};
use crate::template::{self, TemplateBundle};
use crate::Error;

/// Violations of the caller contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// A required configuration field is missing or empty.
    #[error("required configuration field {} is missing", field)]
    MissingField {
        /// The dotted path of the missing field.
        field: &'static str,
    },
    /// The pool's OS type contradicts its distribution.
    #[error("distro {} is not valid for {} agent pools", distro, os_type)]
    OsMismatch {
        /// The configured distribution identifier.
        distro: &'static str,
        /// The configured OS type.
        os_type: &'static str,
    },
    /// The orchestrator version string does not parse.
    #[error("invalid orchestrator version '{}': {}", version, source)]
    InvalidVersion {
        /// The version string as configured.
        version: String,
        /// The parse failure.
        #[source]
        source: datamodel::ParseError,
    },
    /// A pre-resolved component reference is empty.
    #[error("resolved component reference {} is empty", component)]
    EmptyComponent {
        /// The empty component field.
        component: &'static str,
    },
}

/// Everything one render consumes, resolved and validated.
pub(crate) struct RenderContext {
    pub bundle: &'static TemplateBundle,
    pub os_type: OsType,
    pub scalars: BTreeMap<&'static str, String>,
    pub runtime: ContainerRuntime,
    pub has_data_dir: bool,
    pub gpu_driver_install: bool,
    pub gpu_device_plugin: bool,
    pub dynamic_kubelet: bool,
    pub hosts_config_agent: bool,
}

fn gpu_driver_version(vm_size: &str) -> &'static str {
    // The NV series carries GRID drivers; everything else gets the CUDA
    // driver line.
    if vm_size.to_lowercase().starts_with("standard_nv") {
        "418.126.02"
    } else {
        "418.40.04"
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ContextError> {
    if value.is_empty() {
        return Err(ContextError::MissingField { field });
    }
    Ok(())
}

impl RenderContext {
    pub(crate) fn build(config: &NodeBootstrapConfig<'_>) -> Result<Self, Error> {
        let properties = &config.cluster.properties;
        let pool = config.agent_pool;

        if pool.distro.os_type() != pool.os_type {
            return Err(ContextError::OsMismatch {
                distro: pool.distro.name(),
                os_type: match pool.os_type {
                    OsType::Linux => "Linux",
                    OsType::Windows => "Windows",
                },
            }
            .into());
        }
        let bundle = template::bundle_for(pool.distro);

        let version = &properties.orchestrator_profile.orchestrator_version;
        version
            .parse::<KubernetesVersion>()
            .map_err(|source| ContextError::InvalidVersion {
                version: version.clone(),
                source,
            })?;

        for (reference, component) in [
            (&config.components.pod_infra_container_image_url, "podInfraContainerImageURL"),
            (&config.components.hyperkube_image_url, "hyperkubeImageURL"),
            (&config.components.windows_package_url, "windowsPackageURL"),
        ] {
            if reference.is_empty() {
                return Err(ContextError::EmptyComponent { component }.into());
            }
        }

        let cluster_config = properties.orchestrator_profile.kubernetes_config.as_ref();
        let pool_config = pool.kubernetes_config.as_ref();

        let runtime = pool_config
            .and_then(|config| config.container_runtime)
            .or_else(|| cluster_config.and_then(|config| config.container_runtime))
            .unwrap_or_default();
        let data_dir = pool_config
            .and_then(|config| config.data_dir())
            .or_else(|| cluster_config.and_then(|config| config.data_dir()));
        let hosts_config_agent = pool_config
            .and_then(|config| config.private_cluster.as_ref())
            .or_else(|| cluster_config.and_then(|config| config.private_cluster.as_ref()))
            .map(|private| private.hosts_config_agent_enabled())
            .unwrap_or(false);

        let merged_flags = flags::merge_kubelet_flags(&[
            Some(&DEFAULT_KUBELET_FLAGS),
            cluster_config.and_then(|config| config.kubelet_config.as_ref()),
            pool_config.and_then(|config| config.kubelet_config.as_ref()),
        ])?;

        let service_principal = properties
            .service_principal_profile
            .as_ref()
            .ok_or(ContextError::MissingField {
                field: "servicePrincipalProfile",
            })?;
        let api_server_name = format!(
            "{}.hcp.{}.{}",
            properties.hosted_master_profile.dns_prefix,
            config.cluster.location,
            config.cloud.endpoint_config.api_server_dns_suffix
        );

        let mut scalars: BTreeMap<&'static str, String> = BTreeMap::new();
        scalars.insert("API_SERVER_NAME", api_server_name);
        scalars.insert("CLOUD_NAME", config.cloud.cloud_name.clone());
        scalars.insert("LOCATION", config.cluster.location.clone());
        scalars.insert("TENANT_ID", config.tenant_id.clone());
        scalars.insert("SUBSCRIPTION_ID", config.subscription_id.clone());
        scalars.insert("RESOURCE_GROUP", config.resource_group.clone());
        scalars.insert(
            "USER_ASSIGNED_IDENTITY_ID",
            config.user_assigned_identity_client_id.clone(),
        );
        scalars.insert("SUBNET_ID", pool.vnet_subnet_id.clone());
        scalars.insert("VM_TYPE", pool.availability_profile.vm_type().to_owned());
        scalars.insert("KUBERNETES_VERSION", version.clone());
        scalars.insert("HYPERKUBE_IMAGE", config.components.hyperkube_image_url.clone());
        scalars.insert(
            "PAUSE_IMAGE",
            config.components.pod_infra_container_image_url.clone(),
        );
        scalars.insert("SERVICE_PRINCIPAL_CLIENT_ID", service_principal.client_id.clone());
        scalars.insert("SERVICE_PRINCIPAL_SECRET", service_principal.secret.clone());
        scalars.insert("KUBELET_FLAGS", flags::kubelet_flags_string(&merged_flags));
        scalars.insert("CONTAINER_RUNTIME", runtime.name().to_owned());
        scalars.insert(
            "CONTAINER_DATA_DIR",
            data_dir.map(str::to_owned).unwrap_or_default(),
        );
        scalars.insert("GPU_NODE", config.enable_nvidia.to_string());
        scalars.insert("ENABLE_HOSTS_CONFIG_AGENT", hosts_config_agent.to_string());
        if let Some(placeholder) = bundle.gpu_driver_placeholder {
            scalars.insert(placeholder, gpu_driver_version(&pool.vm_size).to_owned());
        }

        match pool.os_type {
            OsType::Linux => {
                let linux = properties
                    .linux_profile
                    .as_ref()
                    .ok_or(ContextError::MissingField {
                        field: "linuxProfile",
                    })?;
                require(&linux.admin_username, "linuxProfile.adminUsername")?;
                let ssh_key = linux
                    .ssh
                    .public_keys
                    .iter()
                    .map(|key| key.key_data.trim())
                    .find(|key| !key.is_empty())
                    .ok_or(ContextError::MissingField {
                        field: "linuxProfile.ssh.publicKeys",
                    })?;
                scalars.insert("ADMIN_USERNAME", linux.admin_username.clone());
                scalars.insert("SSH_PUBLIC_KEY", ssh_key.to_owned());
            }
            OsType::Windows => {
                let windows = properties
                    .windows_profile
                    .as_ref()
                    .ok_or(ContextError::MissingField {
                        field: "windowsProfile",
                    })?;
                require(&windows.admin_username, "windowsProfile.adminUsername")?;
                scalars.insert("WINDOWS_ADMIN_USERNAME", windows.admin_username.clone());
                scalars.insert("WINDOWS_PACKAGE_URL", config.components.windows_package_url.clone());
            }
        }

        Ok(RenderContext {
            bundle,
            os_type: pool.os_type,
            scalars,
            runtime,
            has_data_dir: data_dir.is_some(),
            gpu_driver_install: config.config_gpu_driver_if_needed && config.enable_nvidia,
            gpu_device_plugin: config.enable_gpu_device_plugin_if_needed && config.enable_nvidia,
            dynamic_kubelet: config.enable_dynamic_kubelet,
            hosts_config_agent,
        })
    }
}
