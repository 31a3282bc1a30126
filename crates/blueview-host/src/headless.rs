//! In-memory host implementation.
//!
//! [`HeadlessElement`] and [`HeadlessSurface`] implement the host traits
//! without a real document, for headless hosts and tests. Because a render
//! instance takes exclusive ownership of its element, the element exposes a
//! [`HeadlessProbe`] that shares its internal state, so callers can still
//! inspect what was rendered after handing the element over.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{BlockElement, Surface, SurfaceHandle};

/// Internal state of a [`HeadlessElement`], shared with its probe.
#[derive(Default)]
struct ElementState {
    clears: u32,
    errors: Vec<String>,
    surface: Option<Rc<RefCell<HeadlessSurface>>>,
}

/// In-memory [`BlockElement`].
#[derive(Default)]
pub struct HeadlessElement {
    state: Rc<RefCell<ElementState>>,
}

impl HeadlessElement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe sharing this element's state, for inspection after the
    /// element has been handed to a render instance.
    #[must_use]
    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl BlockElement for HeadlessElement {
    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        state.clears += 1;
        state.errors.clear();
        state.surface = None;
    }

    fn create_surface(&mut self, class: &str) -> SurfaceHandle {
        let surface = Rc::new(RefCell::new(HeadlessSurface {
            class: class.to_owned(),
            height: 0,
            error: None,
        }));
        self.state.borrow_mut().surface = Some(Rc::clone(&surface));
        surface
    }

    fn append_error(&mut self, text: &str) {
        self.state.borrow_mut().errors.push(text.to_owned());
    }
}

/// Inspection handle for a [`HeadlessElement`].
pub struct HeadlessProbe {
    state: Rc<RefCell<ElementState>>,
}

impl HeadlessProbe {
    /// The child surface, if one has been created.
    #[must_use]
    pub fn surface(&self) -> Option<Rc<RefCell<HeadlessSurface>>> {
        self.state.borrow().surface.clone()
    }

    /// Error-message nodes appended directly to the element.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    /// How many times the element has been cleared.
    #[must_use]
    pub fn clears(&self) -> u32 {
        self.state.borrow().clears
    }
}

/// In-memory [`Surface`].
pub struct HeadlessSurface {
    class: String,
    height: u32,
    error: Option<String>,
}

impl HeadlessSurface {
    /// CSS class the surface was created with.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The error-message node currently shown, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Surface for HeadlessSurface {
    fn set_height(&mut self, px: u32) {
        self.height = px;
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.error = None;
    }

    fn show_error(&mut self, text: &str) {
        self.error = Some(text.to_owned());
    }
}
