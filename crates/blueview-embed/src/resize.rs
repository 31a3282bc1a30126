//! Pointer-drag resizing of a render surface.
//!
//! One controller per instance, attached whenever a surface exists —
//! attachment does not depend on whether the engine rendered successfully.
//! The state machine is Idle → Dragging → Idle; while dragging, document-wide
//! pointer listeners are held as a [`ListenerGuard`] so repeated drags never
//! leak attachments, and tearing an instance down mid-drag releases them too.

use std::cell::RefCell;
use std::rc::Rc;

use blueview_host::{ListenerGuard, ListenerRegistry, SurfaceHandle};
use blueview_settings::SettingsStore;

struct DragState {
    start_y: i32,
    start_height: u32,
    _listeners: ListenerGuard,
}

/// Per-instance drag state machine adjusting a surface's height.
pub struct ResizeController {
    surface: SurfaceHandle,
    settings: Rc<RefCell<SettingsStore>>,
    listeners: Rc<ListenerRegistry>,
    drag: Option<DragState>,
}

impl ResizeController {
    #[must_use]
    pub fn new(
        surface: SurfaceHandle,
        settings: Rc<RefCell<SettingsStore>>,
        listeners: Rc<ListenerRegistry>,
    ) -> Self {
        Self {
            surface,
            settings,
            listeners,
            drag: None,
        }
    }

    /// Pointer pressed on the resize handle: enter Dragging and attach
    /// document-wide move/up listeners.
    pub fn pointer_down(&mut self, y: i32) {
        if self.drag.is_some() {
            return;
        }
        self.drag = Some(DragState {
            start_y: y,
            start_height: self.surface.borrow().height(),
            _listeners: self.listeners.attach(),
        });
    }

    /// Pointer moved while dragging.
    ///
    /// The proposed height is `start_height + (y - start_y)`. The surface is
    /// updated only when the proposal falls inside `[min, max]`; out-of-band
    /// proposals are ignored and the surface holds its last valid height, so
    /// the drag feels sticky at the bounds rather than clamped.
    pub fn pointer_move(&mut self, y: i32) {
        let Some(drag) = &self.drag else {
            return;
        };
        let proposed = i64::from(drag.start_height) + i64::from(y - drag.start_y);
        let bounds = self.settings.borrow().settings();
        if proposed >= i64::from(bounds.min_height) && proposed <= i64::from(bounds.max_height) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            self.surface.borrow_mut().set_height(proposed as u32);
        }
    }

    /// Pointer released: exit Dragging, detach the document-wide listeners,
    /// and commit the final measured height as the new default.
    ///
    /// A drag that never changed the height commits nothing.
    pub fn pointer_up(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let final_height = self.surface.borrow().height();
        if final_height != drag.start_height {
            self.settings.borrow_mut().commit_default_height(final_height);
        }
        // DragState drops here, detaching the listeners.
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
