//! Render-instance lifecycle management for blueview.
//!
//! This crate is the core of the embedding engine. The host discovers fenced
//! code blocks tagged [`BLOCK_TAG`] and hands each one to
//! [`BlueprintProcessor::process_block`], which:
//!
//! 1. ensures the external engine is loaded (once per session),
//! 2. builds a [`RenderInstance`] owning the block's element and surface,
//! 3. starts the instance asynchronously,
//! 4. attaches a [`ResizeController`] to the surface,
//! 5. registers the instance for later teardown.
//!
//! Instances are fully independent: one failed render never affects another.
//! On whole-system unload every registered instance is stopped and the cached
//! engine capability is released, leaving no residual state.
//!
//! # Modules
//!
//! - [`instance`]: [`RenderInstance`] state machine (Created → Starting →
//!   Running/Failed → Stopped)
//! - [`resize`]: [`ResizeController`] pointer-drag state machine
//! - [`registry`]: [`InstanceRegistry`] of live instances
//! - [`processor`]: [`BlueprintProcessor`] entry point and bulk teardown

mod instance;
mod processor;
mod registry;
mod resize;

#[cfg(test)]
pub(crate) mod testutil;

pub use instance::{InstanceId, InstanceState, RenderInstance};
pub use processor::{BLOCK_TAG, BlueprintProcessor};
pub use registry::InstanceRegistry;
pub use resize::ResizeController;
