//! The engine capability contract.
//!
//! A [`DiagramEngine`] constructs one [`EngineHandle`] per render surface.
//! The handle exposes exactly two operations: `start`, which completes
//! asynchronously through a one-shot [`Completion`] callback, and an optional
//! `stop`. Engines without teardown support keep the default no-op `stop`.

use blueview_host::SurfaceHandle;

/// Options passed to the engine when constructing a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Initial surface height, e.g. `"400px"`.
    pub height: String,
    /// Diagram kind understood by the engine.
    pub kind: String,
}

impl RenderOptions {
    /// Options for a blueprint diagram at the given initial height.
    #[must_use]
    pub fn blueprint(height_px: u32) -> Self {
        Self {
            height: format!("{height_px}px"),
            kind: "blueprint".to_owned(),
        }
    }
}

/// Failure payload reported by the engine's completion callback.
///
/// Either message may be absent; [`best_message`](Self::best_message) picks
/// the most specific one available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFailure {
    /// Human-oriented message the engine wants shown to the user.
    pub displayed_message: Option<String>,
    /// Raw error message.
    pub message: Option<String>,
}

impl RenderFailure {
    /// The most specific message available: the displayed message, else the
    /// raw message, else `"Unknown error"`.
    #[must_use]
    pub fn best_message(&self) -> &str {
        self.displayed_message
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("Unknown error")
    }
}

/// One-shot completion callback for an asynchronous engine start.
///
/// The engine invokes it on a later event-loop turn; no ordering is
/// guaranteed across instances.
pub type Completion = Box<dyn FnOnce(Result<(), RenderFailure>)>;

/// Error from constructing or stopping an engine renderer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine's renderer constructor failed.
    #[error("renderer construction failed: {0}")]
    Construction(String),
    /// The engine's stop operation failed.
    #[error("renderer stop failed: {0}")]
    Stop(String),
}

/// A live renderer bound to one surface.
pub trait EngineHandle {
    /// Begin rendering. Completion is reported exactly once via `done`,
    /// possibly on a later event-loop turn.
    fn start(&mut self, done: Completion);

    /// Tear the renderer down. Engines without stop support keep the
    /// default no-op.
    fn stop(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// The loaded diagram engine capability.
pub trait DiagramEngine {
    /// Construct a renderer for `source`, drawing into `surface`.
    fn create(
        &self,
        source: &str,
        surface: SurfaceHandle,
        options: &RenderOptions,
    ) -> Result<Box<dyn EngineHandle>, EngineError>;
}

impl std::fmt::Debug for dyn DiagramEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn DiagramEngine")
    }
}
