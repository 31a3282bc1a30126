//! External diagram-engine contract and bootstrap for blueview.
//!
//! The diagram engine is an opaque collaborator: we load its bundle, construct
//! renderer handles from it, start them, and stop them. Diagram semantics,
//! layout, and parsing of the diagram source all live on the other side of
//! this boundary.
//!
//! The crate has two halves:
//!
//! - [`engine`]: the narrow capability contract ([`DiagramEngine`],
//!   [`EngineHandle`]) plus the option and failure records that cross it
//! - [`loader`]: [`EngineLoader`], which evaluates an [`EngineBundle`] at most
//!   once per session and caches the resulting capability

mod engine;
mod loader;

pub use engine::{Completion, DiagramEngine, EngineError, EngineHandle, RenderFailure, RenderOptions};
pub use loader::{BootstrapError, EngineBundle, EngineLoader};
