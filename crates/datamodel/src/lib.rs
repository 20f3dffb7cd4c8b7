//! Data model for describing a managed Kubernetes cluster and the node pools
//! it provisions.
//!
//! The types in this crate are the input contract of the
//! [nodebaker](../nodebaker/index.html) engine: a [`ClusterSpec`] tree shaped
//! like the external cluster description, a [`CloudSpecConfig`] with the
//! cloud-environment endpoint base paths, and a handful of closed enums
//! ([`Distro`], [`OsType`], [`ContainerRuntime`]) that select among template
//! variants. The tree is plain data: it is built by an external
//! configuration loader and treated as immutable for the duration of a
//! render.
//!
//! Orchestrator versions are always handled through [`KubernetesVersion`],
//! which compares numerically. Comparing raw version strings is a bug:
//! `"1.9.0"` sorts after `"1.17.0"` lexicographically.
#![cfg_attr(not(test), deny(missing_docs))]

mod cloud;
mod cluster;
mod distro;
mod version;

pub use cloud::{azure_public_cloud_spec, CloudSpecConfig, EndpointConfig, KubernetesSpecConfig};
pub use cluster::{
    AgentPoolProfile, ClusterSpec, HostedMasterProfile, KubernetesConfig, LinuxProfile,
    OrchestratorProfile, PrivateCluster, Properties, PublicKey, ServicePrincipalProfile,
    SshConfig, WindowsProfile, CONTAINER_DATA_DIR_KEY,
};
pub use distro::{AvailabilityProfile, ContainerRuntime, Distro, OsType};
pub use version::{is_kubernetes_version_ge, KubernetesVersion, ParseError};
