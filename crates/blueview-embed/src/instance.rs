//! One render instance per discovered block.
//!
//! A [`RenderInstance`] exclusively owns its block element, its surface, and
//! its engine handle. The lifecycle is strictly sequential per instance:
//! Created → Starting → Running or Failed, and any state → Stopped on
//! teardown. Completion arrives via the engine's one-shot callback on an
//! unspecified later event-loop turn, so the callback shares state with the
//! instance through an `Rc<RefCell>` cell and checks for teardown before
//! touching the surface.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use blueview_engine::{DiagramEngine, EngineHandle, RenderOptions};
use blueview_host::{BlockElement, SurfaceHandle};
use blueview_settings::RenderSettings;
use uuid::Uuid;

use crate::resize::ResizeController;

/// Process-unique identifier for a render instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blueprint-{}", self.0)
    }
}

/// Lifecycle state of a render instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Constructed, engine handle ready, not yet started.
    Created,
    /// Engine start requested, completion pending.
    Starting,
    /// Engine reported success.
    Running,
    /// Construction or rendering failed; an inline message is shown.
    Failed,
    /// Torn down. Terminal.
    Stopped,
}

/// State shared between the instance and its completion callback.
struct Shared {
    state: InstanceState,
    surface: Option<SurfaceHandle>,
}

/// An engine-rendered surface bound to one document fragment.
pub struct RenderInstance {
    id: InstanceId,
    source: String,
    element: Box<dyn BlockElement>,
    handle: Option<Box<dyn EngineHandle>>,
    resize: Option<ResizeController>,
    shared: Rc<RefCell<Shared>>,
}

impl RenderInstance {
    /// Build an instance for a discovered block.
    ///
    /// Trims the source, clears the element, creates the child surface at the
    /// configured default height, and constructs the engine renderer. A
    /// construction error does not propagate: the element gets an inline
    /// error message and the instance comes back in [`InstanceState::Failed`]
    /// so bulk teardown stays uniform.
    #[must_use]
    pub fn create(
        id: InstanceId,
        source: &str,
        mut element: Box<dyn BlockElement>,
        engine: &dyn DiagramEngine,
        settings: &RenderSettings,
    ) -> Self {
        let source = source.trim().to_owned();
        element.clear();
        let surface = element.create_surface("blueprint-container");
        surface.borrow_mut().set_height(settings.default_height);

        let options = RenderOptions::blueprint(settings.default_height);
        match engine.create(&source, Rc::clone(&surface), &options) {
            Ok(handle) => Self {
                id,
                source,
                element,
                handle: Some(handle),
                resize: None,
                shared: Rc::new(RefCell::new(Shared {
                    state: InstanceState::Created,
                    surface: Some(surface),
                })),
            },
            Err(e) => {
                tracing::error!(%id, "renderer construction failed: {e}");
                Self::into_failed(id, source, element, &e.to_string())
            }
        }
    }

    /// Build an instance that failed before a renderer could be constructed,
    /// e.g. because the engine never initialized.
    #[must_use]
    pub fn failed(
        id: InstanceId,
        source: &str,
        element: Box<dyn BlockElement>,
        message: &str,
    ) -> Self {
        Self::into_failed(id, source.trim().to_owned(), element, message)
    }

    fn into_failed(
        id: InstanceId,
        source: String,
        mut element: Box<dyn BlockElement>,
        message: &str,
    ) -> Self {
        element.clear();
        element.append_error(message);
        Self {
            id,
            source,
            element,
            handle: None,
            resize: None,
            shared: Rc::new(RefCell::new(Shared {
                state: InstanceState::Failed,
                surface: None,
            })),
        }
    }

    /// Ask the engine to start rendering.
    ///
    /// Transitions Created → Starting and registers the one-shot completion
    /// callback. On success the state becomes Running; on failure it becomes
    /// Failed and the surface contents are replaced with the most specific
    /// error message the engine supplied. A completion arriving after
    /// [`stop`](Self::stop) is dropped.
    pub fn start(&mut self) {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.state != InstanceState::Created {
                return;
            }
            shared.state = InstanceState::Starting;
        }
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        let id = self.id;
        let shared = Rc::clone(&self.shared);
        handle.start(Box::new(move |result| {
            let mut shared = shared.borrow_mut();
            if shared.state == InstanceState::Stopped {
                tracing::debug!(%id, "late render completion after teardown, ignoring");
                return;
            }
            match result {
                Ok(()) => {
                    shared.state = InstanceState::Running;
                    tracing::debug!(%id, "render complete");
                }
                Err(failure) => {
                    shared.state = InstanceState::Failed;
                    tracing::error!(%id, "render failed: {}", failure.best_message());
                    if let Some(surface) = &shared.surface {
                        let mut surface = surface.borrow_mut();
                        surface.clear();
                        surface.show_error(failure.best_message());
                    }
                }
            }
        }));
    }

    /// Tear the instance down. Idempotent.
    ///
    /// Detaches any drag listeners, then invokes the engine's stop if the
    /// handle supports it. Stop failures are logged and swallowed — teardown
    /// always completes.
    pub fn stop(&mut self) {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.state == InstanceState::Stopped {
                return;
            }
            shared.state = InstanceState::Stopped;
        }
        // Dropping the controller releases an in-flight drag's listeners.
        self.resize = None;
        if let Some(mut handle) = self.handle.take() {
            match handle.stop() {
                Ok(()) => tracing::debug!(id = %self.id, "renderer stopped"),
                Err(e) => tracing::error!(id = %self.id, "error stopping renderer: {e}"),
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> InstanceState {
        self.shared.borrow().state
    }

    /// The trimmed diagram source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The rendering surface, if construction got far enough to create one.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.shared.borrow().surface.clone()
    }

    /// Attach the resize controller for this instance's surface.
    pub fn attach_resize(&mut self, controller: ResizeController) {
        self.resize = Some(controller);
    }

    /// The attached resize controller, for routing pointer events.
    pub fn resize_mut(&mut self) -> Option<&mut ResizeController> {
        self.resize.as_mut()
    }
}
