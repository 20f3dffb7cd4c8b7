//! Template bundles and their selection.
//!
//! Every distribution resolves to exactly one bundle: a static script
//! skeleton plus the fixed set of insertion points it exposes. Keeping the
//! "which template for which distro" decision in one total `match` makes it
//! testable in isolation and leaves no room for a fallback variant.

mod render;

pub(crate) use render::substitute;
pub use render::RenderError;

use datamodel::Distro;

/// A point in a script skeleton where an optional addon block may be
/// inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Container-runtime specific setup (containerd service and config).
    RuntimeSetup,
    /// Relocation of container storage onto the temp disk.
    TempDiskMount,
    /// GPU driver installation.
    GpuDriverInstall,
    /// GPU device-plugin static pod manifest.
    GpuDevicePlugin,
    /// Dynamic kubelet configuration directory.
    DynamicKubeletConfig,
    /// Private-cluster hosts-config agent.
    HostsConfigAgent,
}

impl InsertionPoint {
    /// The marker this point occupies in skeleton text.
    pub fn marker(&self) -> &'static str {
        match self {
            InsertionPoint::RuntimeSetup => "RUNTIME_SETUP",
            InsertionPoint::TempDiskMount => "TEMP_DISK_MOUNT",
            InsertionPoint::GpuDriverInstall => "GPU_DRIVER_INSTALL",
            InsertionPoint::GpuDevicePlugin => "GPU_DEVICE_PLUGIN",
            InsertionPoint::DynamicKubeletConfig => "DYNAMIC_KUBELET_CONFIG",
            InsertionPoint::HostsConfigAgent => "HOSTS_CONFIG_AGENT",
        }
    }

    /// The human-readable addon name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            InsertionPoint::RuntimeSetup => "runtime-setup",
            InsertionPoint::TempDiskMount => "temp-disk",
            InsertionPoint::GpuDriverInstall => "gpu-driver-install",
            InsertionPoint::GpuDevicePlugin => "gpu-device-plugin",
            InsertionPoint::DynamicKubeletConfig => "dynamic-kubelet",
            InsertionPoint::HostsConfigAgent => "hosts-config-agent",
        }
    }

    /// The addon block template inserted when this point is enabled.
    pub fn block(&self) -> &'static str {
        match self {
            InsertionPoint::RuntimeSetup => {
                include_str!("../../templates/linux/addons/runtime-setup.sh.tpl")
            }
            InsertionPoint::TempDiskMount => {
                include_str!("../../templates/linux/addons/temp-disk.sh.tpl")
            }
            InsertionPoint::GpuDriverInstall => {
                include_str!("../../templates/linux/addons/gpu-driver-install.sh.tpl")
            }
            InsertionPoint::GpuDevicePlugin => {
                include_str!("../../templates/linux/addons/gpu-device-plugin.sh.tpl")
            }
            InsertionPoint::DynamicKubeletConfig => {
                include_str!("../../templates/linux/addons/dynamic-kubelet.sh.tpl")
            }
            InsertionPoint::HostsConfigAgent => {
                include_str!("../../templates/linux/addons/hosts-config-agent.sh.tpl")
            }
        }
    }
}

/// A distribution's script skeleton and the insertion points it exposes.
#[derive(Debug)]
pub struct TemplateBundle {
    /// The bundle name, matching the distro identifier.
    pub name: &'static str,
    /// The static script skeleton.
    pub skeleton: &'static str,
    /// The insertion points the skeleton declares.
    pub insertion_points: &'static [InsertionPoint],
    /// The placeholder name used for GPU driver substitutions, present only
    /// on GPU-capable bundles.
    pub gpu_driver_placeholder: Option<&'static str>,
}

impl TemplateBundle {
    /// Whether the skeleton declares the given insertion point.
    pub fn declares(&self, point: InsertionPoint) -> bool {
        self.insertion_points.contains(&point)
    }
}

const AKS_LINUX_INSERTION_POINTS: &[InsertionPoint] = &[
    InsertionPoint::RuntimeSetup,
    InsertionPoint::TempDiskMount,
    InsertionPoint::GpuDriverInstall,
    InsertionPoint::GpuDevicePlugin,
    InsertionPoint::DynamicKubeletConfig,
    InsertionPoint::HostsConfigAgent,
];

const RAW_LINUX_INSERTION_POINTS: &[InsertionPoint] = &[
    InsertionPoint::RuntimeSetup,
    InsertionPoint::TempDiskMount,
    InsertionPoint::DynamicKubeletConfig,
    InsertionPoint::HostsConfigAgent,
];

static AKS_UBUNTU_1604: TemplateBundle = TemplateBundle {
    name: "aks-ubuntu-16.04",
    skeleton: include_str!("../../templates/linux/aks-ubuntu-16.04.sh.tpl"),
    insertion_points: AKS_LINUX_INSERTION_POINTS,
    gpu_driver_placeholder: Some("GPU_DRIVER_VERSION"),
};

static AKS_UBUNTU_1804: TemplateBundle = TemplateBundle {
    name: "aks-ubuntu-18.04",
    skeleton: include_str!("../../templates/linux/aks-ubuntu-18.04.sh.tpl"),
    insertion_points: AKS_LINUX_INSERTION_POINTS,
    gpu_driver_placeholder: Some("GPU_DRIVER_VERSION"),
};

static AKS_UBUNTU_GPU_1804: TemplateBundle = TemplateBundle {
    name: "aks-ubuntu-gpu-18.04",
    skeleton: include_str!("../../templates/linux/aks-ubuntu-gpu-18.04.sh.tpl"),
    insertion_points: AKS_LINUX_INSERTION_POINTS,
    gpu_driver_placeholder: Some("GPU_DRIVER_VERSION"),
};

static UBUNTU: TemplateBundle = TemplateBundle {
    name: "ubuntu",
    skeleton: include_str!("../../templates/linux/ubuntu.sh.tpl"),
    insertion_points: RAW_LINUX_INSERTION_POINTS,
    gpu_driver_placeholder: None,
};

static AKS_WINDOWS: TemplateBundle = TemplateBundle {
    name: "aks-windows",
    skeleton: include_str!("../../templates/windows/aks-windows.ps1.tpl"),
    insertion_points: &[],
    gpu_driver_placeholder: None,
};

/// Returns the template bundle for a distribution.
///
/// Total over the closed [`Distro`] set: every distribution resolves to
/// exactly one bundle.
pub fn bundle_for(distro: Distro) -> &'static TemplateBundle {
    match distro {
        Distro::AksUbuntu1604 => &AKS_UBUNTU_1604,
        Distro::AksUbuntu1804 => &AKS_UBUNTU_1804,
        Distro::AksUbuntuGpu1804 => &AKS_UBUNTU_GPU_1804,
        Distro::Ubuntu => &UBUNTU,
        Distro::AksWindows => &AKS_WINDOWS,
    }
}
