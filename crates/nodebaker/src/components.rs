//! Resolution of version-dependent component references.
//!
//! A node needs a handful of artifacts whose location depends on the
//! orchestrator version: the pause (pod infra) container image, the main
//! orchestrator-binary image and the Windows binary package. The mapping
//! from version to per-component relative reference lives in a maintained
//! table; resolution concatenates the relative reference onto the matching
//! cloud endpoint base path. An unknown version is a hard failure, because
//! node provisioning must never silently downgrade to an unintended image.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use log::debug;
use thiserror::Error;

use datamodel::{CloudSpecConfig, KubernetesConfig};

/// Table key for the pause (pod infra) container image.
pub const PAUSE_COMPONENT: &str = "pause";
/// Table key for the main orchestrator-binary image.
pub const HYPERKUBE_COMPONENT: &str = "hyperkube";
/// Table key for the Windows node binary package.
pub const WINDOWS_PACKAGE_COMPONENT: &str = "windowszip";

/// Per-version relative references, keyed by component kind.
pub type ComponentTable = BTreeMap<String, BTreeMap<String, String>>;

/// Version-resolution failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComponentError {
    /// The component table has no entry for the requested version.
    #[error("no component table entry for orchestrator version {}", version)]
    UnsupportedVersion {
        /// The version that was requested.
        version: String,
    },
    /// The version is known but lacks an entry for a component kind.
    #[error("component table for version {} has no {} entry", version, component)]
    MissingComponent {
        /// The version that was requested.
        version: String,
        /// The missing component kind.
        component: String,
    },
}

/// The fully qualified component references for one orchestrator version.
///
/// Never partially populated: resolution fails rather than emitting an empty
/// reference for any field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct K8sComponents {
    /// The pause (pod infra) container image reference.
    pub pod_infra_container_image_url: String,
    /// The main orchestrator-binary image reference.
    pub hyperkube_image_url: String,
    /// The Windows node binary package URL.
    pub windows_package_url: String,
}

lazy_static! {
    pub(crate) static ref DEFAULT_COMPONENT_TABLE: ComponentTable = {
        let mut table = ComponentTable::new();
        for (version, pause, hyperkube, windows_package) in [
            ("1.15.7", "oss/kubernetes/pause:1.3.1", "hyperkube-amd64:v1.15.7", "v1.15.7-1int.zip"),
            ("1.15.11", "oss/kubernetes/pause:1.3.1", "hyperkube-amd64:v1.15.11", "v1.15.11-1int.zip"),
            ("1.16.8", "oss/kubernetes/pause:1.3.1", "hyperkube-amd64:v1.16.8", "v1.16.8-1int.zip"),
            ("1.16.10", "oss/kubernetes/pause:1.3.1", "hyperkube-amd64:v1.16.10", "v1.16.10-1int.zip"),
            ("1.17.7", "oss/kubernetes/pause:1.4.1", "hyperkube-amd64:v1.17.7", "v1.17.7-1int.zip"),
            ("1.17.9", "oss/kubernetes/pause:1.4.1", "hyperkube-amd64:v1.17.9", "v1.17.9-1int.zip"),
            ("1.18.2", "oss/kubernetes/pause:1.4.1", "hyperkube-amd64:v1.18.2", "v1.18.2-1int.zip"),
            ("1.18.4", "oss/kubernetes/pause:1.4.1", "hyperkube-amd64:v1.18.4", "v1.18.4-1int.zip"),
        ] {
            let mut components = BTreeMap::new();
            components.insert(PAUSE_COMPONENT.to_owned(), pause.to_owned());
            components.insert(HYPERKUBE_COMPONENT.to_owned(), hyperkube.to_owned());
            components.insert(WINDOWS_PACKAGE_COMPONENT.to_owned(), windows_package.to_owned());
            table.insert(version.to_owned(), components);
        }
        table
    };
}

fn component(
    table: &ComponentTable,
    version: &str,
    kind: &str,
) -> Result<String, ComponentError> {
    let components = table
        .get(version)
        .ok_or_else(|| ComponentError::UnsupportedVersion {
            version: version.to_owned(),
        })?;
    components
        .get(kind)
        .cloned()
        .ok_or_else(|| ComponentError::MissingComponent {
            version: version.to_owned(),
            component: kind.to_owned(),
        })
}

/// Resolves the component references for an orchestrator version against a
/// cloud environment.
///
/// Base paths come from the cloud endpoint configuration unless the cluster
/// configuration overrides them, and a non-empty custom hyperkube image on
/// the configuration supersedes the resolved reference unconditionally.
/// Callers that want to gate the custom image on a version policy apply
/// [`datamodel::is_kubernetes_version_ge`] before setting it.
pub fn resolve(
    table: &ComponentTable,
    version: &str,
    cloud: &CloudSpecConfig,
    kubernetes_config: Option<&KubernetesConfig>,
) -> Result<K8sComponents, ComponentError> {
    let spec = &cloud.kubernetes_spec_config;
    let mcr_image_base = kubernetes_config
        .and_then(|config| config.mcr_kubernetes_image_base.as_deref())
        .unwrap_or(&spec.mcr_kubernetes_image_base);
    let kubernetes_image_base = kubernetes_config
        .and_then(|config| config.kubernetes_image_base.as_deref())
        .unwrap_or(&spec.kubernetes_image_base);

    let pause = format!("{}{}", mcr_image_base, component(table, version, PAUSE_COMPONENT)?);
    let hyperkube = match kubernetes_config
        .and_then(|config| config.custom_hyperkube_image.as_deref())
        .filter(|image| !image.is_empty())
    {
        Some(custom) => custom.to_owned(),
        None => format!(
            "{}{}",
            kubernetes_image_base,
            component(table, version, HYPERKUBE_COMPONENT)?
        ),
    };
    let windows_package = format!(
        "{}{}",
        spec.kube_binaries_sas_url_base,
        component(table, version, WINDOWS_PACKAGE_COMPONENT)?
    );

    debug!("resolved components for orchestrator version {}", version);
    Ok(K8sComponents {
        pod_infra_container_image_url: pause,
        hyperkube_image_url: hyperkube,
        windows_package_url: windows_package,
    })
}
