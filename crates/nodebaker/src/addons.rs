//! Composition of optional provisioning blocks.
//!
//! Each render-time feature flag maps to one insertion point. For every
//! point the selected bundle declares, composition yields either the addon
//! block or an explicit omission; requesting an addon the bundle has no
//! insertion point for is a configuration error, never a silent no-op.

use log::debug;
use thiserror::Error;

use datamodel::ContainerRuntime;

use crate::context::RenderContext;
use crate::template::InsertionPoint;

/// Addon composition failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddonError {
    /// An addon was requested on a bundle that has nowhere to put it.
    #[error("template bundle {} declares no insertion point for the {} addon", bundle, addon)]
    UnsupportedInsertionPoint {
        /// The addon name.
        addon: &'static str,
        /// The bundle name.
        bundle: &'static str,
    },
}

/// Decides, for each insertion point the bundle declares, whether its addon
/// block is included or omitted.
pub(crate) fn compose(
    context: &RenderContext,
) -> Result<Vec<(InsertionPoint, Option<&'static str>)>, AddonError> {
    let requested = [
        (InsertionPoint::RuntimeSetup, context.runtime == ContainerRuntime::Containerd),
        (InsertionPoint::TempDiskMount, context.has_data_dir),
        (InsertionPoint::GpuDriverInstall, context.gpu_driver_install),
        (InsertionPoint::GpuDevicePlugin, context.gpu_device_plugin),
        (InsertionPoint::DynamicKubeletConfig, context.dynamic_kubelet),
        (InsertionPoint::HostsConfigAgent, context.hosts_config_agent),
    ];

    let mut composed = Vec::new();
    for (point, enabled) in requested {
        if !context.bundle.declares(point) {
            if enabled {
                return Err(AddonError::UnsupportedInsertionPoint {
                    addon: point.name(),
                    bundle: context.bundle.name,
                });
            }
            continue;
        }
        if enabled {
            debug!("including {} addon in bundle {}", point.name(), context.bundle.name);
        }
        composed.push((point, enabled.then(|| point.block())));
    }
    Ok(composed)
}
