//! One-shot engine bootstrap.
//!
//! The engine ships as a static bundle that must be evaluated before any
//! rendering can happen. [`EngineLoader`] guarantees the evaluation runs at
//! most once per session: the first `ensure_ready` call evaluates the bundle
//! and caches the capability it installs; every later call returns the cached
//! capability. A failed load is sticky — the bundle is static, so retrying
//! cannot change the outcome — and only [`release`](EngineLoader::release)
//! (whole-system unload) restores the pre-load state.

use std::rc::Rc;

use crate::engine::DiagramEngine;

/// Error from loading the engine bundle.
///
/// Fatal to every subsequent rendering attempt until the session restarts.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Executing the bundle failed.
    #[error("engine bundle evaluation failed: {0}")]
    Evaluation(String),
    /// The bundle ran but installed no renderer entry point.
    #[error("engine entry point missing after bundle evaluation")]
    MissingEntryPoint,
    /// A previous load attempt failed this session.
    #[error("engine failed to initialize earlier in this session")]
    Unavailable,
}

/// The engine's distributable bundle.
pub trait EngineBundle {
    /// Execute the bundle in a fresh evaluation context.
    ///
    /// Returns the entry point the bundle installed, or `None` if execution
    /// succeeded without installing one.
    fn evaluate(&self) -> Result<Option<Rc<dyn DiagramEngine>>, BootstrapError>;
}

enum Slot {
    Unloaded,
    Ready(Rc<dyn DiagramEngine>),
    Failed,
}

/// Loads the engine bundle at most once and caches the capability.
pub struct EngineLoader {
    bundle: Box<dyn EngineBundle>,
    slot: Slot,
}

impl EngineLoader {
    #[must_use]
    pub fn new(bundle: Box<dyn EngineBundle>) -> Self {
        Self {
            bundle,
            slot: Slot::Unloaded,
        }
    }

    /// Return the engine capability, evaluating the bundle on first call.
    ///
    /// After a failed load every call returns [`BootstrapError::Unavailable`]
    /// without re-evaluating the bundle.
    pub fn ensure_ready(&mut self) -> Result<Rc<dyn DiagramEngine>, BootstrapError> {
        match &self.slot {
            Slot::Ready(engine) => Ok(Rc::clone(engine)),
            Slot::Failed => Err(BootstrapError::Unavailable),
            Slot::Unloaded => match self.bundle.evaluate() {
                Ok(Some(engine)) => {
                    tracing::debug!("engine bundle evaluated, capability cached");
                    self.slot = Slot::Ready(Rc::clone(&engine));
                    Ok(engine)
                }
                Ok(None) => {
                    tracing::error!("engine bundle evaluated but no entry point found");
                    self.slot = Slot::Failed;
                    Err(BootstrapError::MissingEntryPoint)
                }
                Err(e) => {
                    tracing::error!("engine bundle evaluation failed: {e}");
                    self.slot = Slot::Failed;
                    Err(e)
                }
            },
        }
    }

    /// Whether the capability is loaded and cached.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.slot, Slot::Ready(_))
    }

    /// Drop the cached capability, restoring the pre-load state.
    ///
    /// Only called on whole-system unload.
    pub fn release(&mut self) {
        self.slot = Slot::Unloaded;
    }
}
