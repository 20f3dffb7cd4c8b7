use serde::{Deserialize, Serialize};

/// Cloud-environment endpoint configuration.
///
/// These are the base paths that version-resolved component suffixes are
/// concatenated onto, plus the DNS suffix the API server FQDN is derived
/// from. The configuration is reference data: loaded once, injected into the
/// engine, and never mutated at render time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSpecConfig {
    /// The cloud environment name, e.g. `AzurePublicCloud`.
    pub cloud_name: String,
    /// Kubernetes artifact endpoints.
    pub kubernetes_spec_config: KubernetesSpecConfig,
    /// DNS endpoints.
    pub endpoint_config: EndpointConfig,
}

/// Base paths for Kubernetes artifacts in a cloud environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesSpecConfig {
    /// Base path for upstream container images, e.g. `k8s.gcr.io/`.
    pub kubernetes_image_base: String,
    /// Base path for mirrored container images, e.g. `mcr.microsoft.com/`.
    #[serde(rename = "mcrKubernetesImageBase")]
    pub mcr_kubernetes_image_base: String,
    /// Base URL for Windows node binary packages.
    #[serde(rename = "kubeBinariesSASURLBase")]
    pub kube_binaries_sas_url_base: String,
}

/// DNS endpoint configuration for a cloud environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// The suffix hosted API server FQDNs end in, e.g. `azmk8s.io`.
    pub api_server_dns_suffix: String,
}

/// The endpoint configuration of the Azure public cloud.
pub fn azure_public_cloud_spec() -> CloudSpecConfig {
    CloudSpecConfig {
        cloud_name: "AzurePublicCloud".to_owned(),
        kubernetes_spec_config: KubernetesSpecConfig {
            kubernetes_image_base: "k8s.gcr.io/".to_owned(),
            mcr_kubernetes_image_base: "mcr.microsoft.com/".to_owned(),
            kube_binaries_sas_url_base: "https://acs-mirror.azureedge.net/wink8s/".to_owned(),
        },
        endpoint_config: EndpointConfig {
            api_server_dns_suffix: "azmk8s.io".to_owned(),
        },
    }
}
