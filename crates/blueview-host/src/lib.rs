//! Host-document abstraction for blueview.
//!
//! The embedding engine never touches the host document directly. Instead the
//! host hands it one [`BlockElement`] per tagged code block, and the engine
//! renders into a child [`Surface`] created inside that element. Two traits
//! form the boundary:
//!
//! - [`BlockElement`]: the document fragment owned by one render instance
//! - [`Surface`]: the resizable child element the diagram engine draws into
//!
//! Document-wide pointer listeners (attached only for the duration of a drag)
//! are modeled as a scoped resource: [`ListenerRegistry::attach`] returns a
//! [`ListenerGuard`] whose drop detaches the listeners.
//!
//! # Implementations
//!
//! - [`HeadlessElement`] / [`HeadlessSurface`]: in-memory implementation for
//!   headless hosts and tests

mod headless;
mod listener;

pub use headless::{HeadlessElement, HeadlessProbe, HeadlessSurface};
pub use listener::{ListenerGuard, ListenerRegistry};

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a rendering surface.
///
/// The render instance, its resize controller, and the diagram engine all hold
/// the same surface; single-threaded event-driven hosts make `Rc<RefCell>` the
/// right sharing primitive.
pub type SurfaceHandle = Rc<RefCell<dyn Surface>>;

/// The resizable child element a diagram is rendered into.
///
/// The embedding engine only ever adjusts the surface's height, wipes it, or
/// replaces its contents with an error message. Whatever the diagram engine
/// draws inside is opaque to us.
pub trait Surface {
    /// Set the visible height in pixels.
    fn set_height(&mut self, px: u32);

    /// Current visible height in pixels.
    fn height(&self) -> u32;

    /// Remove all rendered content.
    fn clear(&mut self);

    /// Replace the contents with a single error-message node.
    fn show_error(&mut self, text: &str);
}

/// One document element the host hands us per tagged block.
///
/// A render instance exclusively owns its element; no other component may
/// mutate it.
pub trait BlockElement {
    /// Remove all children.
    fn clear(&mut self);

    /// Append a child surface with the given CSS class.
    fn create_surface(&mut self, class: &str) -> SurfaceHandle;

    /// Append an error-message node directly to the element.
    ///
    /// Used when construction fails before a surface exists.
    fn append_error(&mut self, text: &str);
}
