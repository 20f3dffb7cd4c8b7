use thiserror::Error;

use crate::addons::AddonError;
use crate::components::ComponentError;
use crate::context::ContextError;
use crate::flags::MergeError;
use crate::template::RenderError;

/// Any failure that can abort the generation of node bootstrap artifacts.
///
/// All failures are fatal for the render that produced them; nothing is
/// retried internally and nothing falls back to a default that could
/// silently misconfigure a node.
#[derive(Debug, Error)]
pub enum Error {
    /// Version or component resolution failed.
    #[error(transparent)]
    Component(#[from] ComponentError),
    /// Kubelet flag or feature-gate merging failed.
    #[error(transparent)]
    Merge(#[from] MergeError),
    /// An addon was requested that the selected template bundle cannot hold.
    #[error(transparent)]
    Addon(#[from] AddonError),
    /// Template substitution failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The configuration violates the caller contract.
    #[error(transparent)]
    Context(#[from] ContextError),
}
