//! Packaging of rendered script text into the final artifacts.
//!
//! The byte layout produced here is an external, versioned contract pinned
//! by the golden fixtures: base64 (standard alphabet, padded, uncompressed)
//! of a cloud-init document for Linux, base64 of the bootstrap script for
//! Windows, and a single-line CSE command that references the unpacked
//! script by path rather than re-embedding it. Pure string functions; no
//! filesystem or network I/O.

use std::collections::BTreeMap;

use crate::template::{substitute, RenderError};

const LINUX_CLOUD_INIT: &str = include_str!("../templates/linux/cloud-init.yml.tpl");
const LINUX_CSE_COMMAND: &str = include_str!("../templates/linux/cse-command.tpl");
const WINDOWS_CSE_COMMAND: &str = include_str!("../templates/windows/cse-command.tpl");

/// Wraps a rendered Linux provision script into the custom-data artifact.
pub(crate) fn encode_linux_custom_data(
    script: &str,
    bundle_name: &str,
) -> Result<String, RenderError> {
    let mut scalars: BTreeMap<&'static str, String> = BTreeMap::new();
    scalars.insert("PROVISION_SCRIPT_B64", base64::encode(script));
    let cloud_init = substitute(LINUX_CLOUD_INIT, bundle_name, &[], &scalars)?;
    Ok(base64::encode(cloud_init))
}

/// Wraps a rendered Windows bootstrap script into the custom-data artifact.
pub(crate) fn encode_windows_custom_data(script: &str) -> String {
    base64::encode(script)
}

/// Renders the Linux CSE command line.
pub(crate) fn linux_cse_command(
    bundle_name: &str,
    scalars: &BTreeMap<&'static str, String>,
) -> Result<String, RenderError> {
    let rendered = substitute(LINUX_CSE_COMMAND, bundle_name, &[], scalars)?;
    Ok(rendered.trim_end_matches('\n').to_owned())
}

/// Renders the Windows CSE command line.
pub(crate) fn windows_cse_command(
    bundle_name: &str,
    scalars: &BTreeMap<&'static str, String>,
) -> Result<String, RenderError> {
    let rendered = substitute(WINDOWS_CSE_COMMAND, bundle_name, &[], scalars)?;
    Ok(rendered.trim_end_matches('\n').to_owned())
}
