use serde::{Deserialize, Serialize};

/// The operating system family of an agent pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsType {
    /// Linux nodes, provisioned with a cloud-init payload.
    Linux,
    /// Windows nodes, provisioned with a PowerShell bootstrap script.
    Windows,
}

impl Default for OsType {
    fn default() -> Self {
        OsType::Linux
    }
}

/// The container runtime an agent pool boots with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    /// The default Docker runtime.
    Docker,
    /// The containerd runtime; selecting it inserts containerd-specific
    /// provisioning steps.
    Containerd,
}

impl ContainerRuntime {
    /// The runtime name as it appears in configuration and rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Containerd => "containerd",
        }
    }
}

impl Default for ContainerRuntime {
    fn default() -> Self {
        ContainerRuntime::Docker
    }
}

/// How the pool's virtual machines are grouped in the cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityProfile {
    /// A virtual machine scale set.
    VirtualMachineScaleSets,
    /// A classic availability set.
    AvailabilitySet,
}

impl AvailabilityProfile {
    /// The VM grouping identifier used by the cloud provider configuration.
    pub fn vm_type(&self) -> &'static str {
        match self {
            AvailabilityProfile::VirtualMachineScaleSets => "vmss",
            AvailabilityProfile::AvailabilitySet => "standard",
        }
    }
}

/// A base operating-system image used to provision a node.
///
/// Every distro resolves to exactly one template bundle in the baker; there
/// is no fallback variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distro {
    /// The managed Ubuntu 16.04 image with node binaries pre-baked.
    #[serde(rename = "aks-ubuntu-16.04")]
    AksUbuntu1604,
    /// The managed Ubuntu 18.04 image with node binaries pre-baked.
    #[serde(rename = "aks-ubuntu-18.04")]
    AksUbuntu1804,
    /// The managed Ubuntu 18.04 image with GPU drivers preinstalled.
    #[serde(rename = "aks-ubuntu-gpu-18.04")]
    AksUbuntuGpu1804,
    /// A raw, unmanaged Ubuntu image; everything is installed at first boot.
    #[serde(rename = "ubuntu")]
    Ubuntu,
    /// The managed Windows Server image.
    #[serde(rename = "aks-windows")]
    AksWindows,
}

impl Distro {
    /// The operating system family this image belongs to.
    pub fn os_type(&self) -> OsType {
        match self {
            Distro::AksWindows => OsType::Windows,
            _ => OsType::Linux,
        }
    }

    /// Whether this image can host GPU workloads.
    ///
    /// Only GPU-capable images expose the GPU insertion points in their
    /// template bundle; requesting GPU provisioning on any other image is a
    /// configuration error rather than a silent no-op.
    pub fn is_gpu_capable(&self) -> bool {
        matches!(
            self,
            Distro::AksUbuntu1604 | Distro::AksUbuntu1804 | Distro::AksUbuntuGpu1804
        )
    }

    /// The stable identifier used in configuration and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Distro::AksUbuntu1604 => "aks-ubuntu-16.04",
            Distro::AksUbuntu1804 => "aks-ubuntu-18.04",
            Distro::AksUbuntuGpu1804 => "aks-ubuntu-gpu-18.04",
            Distro::Ubuntu => "ubuntu",
            Distro::AksWindows => "aks-windows",
        }
    }
}

impl Default for Distro {
    fn default() -> Self {
        Distro::AksUbuntu1604
    }
}
