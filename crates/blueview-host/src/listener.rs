//! Document-wide pointer listeners as a scoped resource.
//!
//! A drag in progress needs move/up listeners on the whole document, not just
//! the drag handle, so the pointer can leave the surface without ending the
//! drag. Attaching returns a [`ListenerGuard`]; dropping the guard detaches
//! both listeners. The registry counts live attachments so teardown code can
//! verify nothing leaked.

use std::cell::Cell;
use std::rc::Rc;

/// Process-wide registry of attached document-level pointer listeners.
pub struct ListenerRegistry {
    active: Cell<usize>,
}

impl ListenerRegistry {
    /// Create a registry with no attached listeners.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            active: Cell::new(0),
        })
    }

    /// Attach document-wide move/up listeners.
    ///
    /// The listeners stay attached until the returned guard is dropped.
    #[must_use]
    pub fn attach(self: &Rc<Self>) -> ListenerGuard {
        self.active.set(self.active.get() + 1);
        ListenerGuard {
            registry: Rc::clone(self),
            detach: None,
        }
    }

    /// Attach with a host-supplied detach hook, run when the guard drops.
    ///
    /// Real hosts use the hook to remove their actual event listeners.
    #[must_use]
    pub fn attach_with(self: &Rc<Self>, detach: Box<dyn FnOnce()>) -> ListenerGuard {
        let mut guard = self.attach();
        guard.detach = Some(detach);
        guard
    }

    /// Number of currently attached listener pairs.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Handle to one attached pair of document-wide listeners.
///
/// Dropping the guard detaches the listeners and runs the host's detach hook,
/// if one was supplied.
pub struct ListenerGuard {
    registry: Rc<ListenerRegistry>,
    detach: Option<Box<dyn FnOnce()>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.registry.active.set(self.registry.active.get() - 1);
        if let Some(detach) = self.detach.take() {
            detach();
        }
        tracing::debug!("document pointer listeners detached");
    }
}
