//! Scripted engine fakes shared across this crate's tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use blueview_engine::{
    BootstrapError, Completion, DiagramEngine, EngineBundle, EngineError, EngineHandle,
    RenderFailure, RenderOptions,
};
use blueview_host::SurfaceHandle;

#[derive(Default)]
struct EngineState {
    defer: Cell<bool>,
    fail_create: RefCell<Option<String>>,
    fail_stop: Cell<bool>,
    next_failures: RefCell<VecDeque<RenderFailure>>,
    pending: RefCell<VecDeque<Completion>>,
    created: Cell<usize>,
    stops: Cell<usize>,
}

/// Scripted [`DiagramEngine`] whose behavior tests configure up front.
///
/// Clones share state, so tests keep one handle for inspection after moving a
/// clone into the code under test. By default every handle starts
/// successfully and synchronously; [`deferred`](Self::deferred) holds
/// completions until the test fires them, modeling the engine resuming on a
/// later event-loop turn.
#[derive(Clone, Default)]
pub(crate) struct FakeEngine {
    state: Rc<EngineState>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold completions until [`complete_next`](Self::complete_next).
    pub(crate) fn deferred(self) -> Self {
        self.state.defer.set(true);
        self
    }

    /// Make the next started handle report a failure with this message.
    pub(crate) fn fail_next_start(&self, displayed_message: &str) {
        self.state.next_failures.borrow_mut().push_back(RenderFailure {
            displayed_message: Some(displayed_message.to_owned()),
            message: None,
        });
    }

    /// Make the next started handle report a failure with no message at all.
    pub(crate) fn fail_next_start_blank(&self) {
        self.state
            .next_failures
            .borrow_mut()
            .push_back(RenderFailure::default());
    }

    /// Make every renderer construction fail.
    pub(crate) fn fail_create(&self, message: &str) {
        *self.state.fail_create.borrow_mut() = Some(message.to_owned());
    }

    /// Make every handle's stop return an error.
    pub(crate) fn fail_stop(&self) {
        self.state.fail_stop.set(true);
    }

    /// Fire the oldest held completion with the given result.
    pub(crate) fn complete_next(&self, result: Result<(), RenderFailure>) {
        let done = self
            .state
            .pending
            .borrow_mut()
            .pop_front()
            .expect("no pending completion");
        done(result);
    }

    /// Held completions not yet fired.
    pub(crate) fn pending(&self) -> usize {
        self.state.pending.borrow().len()
    }

    /// Renderers constructed so far.
    pub(crate) fn created(&self) -> usize {
        self.state.created.get()
    }

    /// Stop calls received across all handles.
    pub(crate) fn stops(&self) -> usize {
        self.state.stops.get()
    }
}

impl DiagramEngine for FakeEngine {
    fn create(
        &self,
        _source: &str,
        _surface: SurfaceHandle,
        _options: &RenderOptions,
    ) -> Result<Box<dyn EngineHandle>, EngineError> {
        if let Some(message) = self.state.fail_create.borrow().clone() {
            return Err(EngineError::Construction(message));
        }
        self.state.created.set(self.state.created.get() + 1);
        Ok(Box::new(FakeHandle {
            state: Rc::clone(&self.state),
        }))
    }
}

struct FakeHandle {
    state: Rc<EngineState>,
}

impl EngineHandle for FakeHandle {
    fn start(&mut self, done: Completion) {
        if self.state.defer.get() {
            self.state.pending.borrow_mut().push_back(done);
            return;
        }
        match self.state.next_failures.borrow_mut().pop_front() {
            Some(failure) => done(Err(failure)),
            None => done(Ok(())),
        }
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.state.stops.set(self.state.stops.get() + 1);
        if self.state.fail_stop.get() {
            return Err(EngineError::Stop("renderer already detached".to_owned()));
        }
        Ok(())
    }
}

/// [`EngineBundle`] that installs a [`FakeEngine`] as its entry point.
pub(crate) struct FakeBundle {
    engine: FakeEngine,
    evaluations: Rc<Cell<u32>>,
}

impl FakeBundle {
    pub(crate) fn new(engine: FakeEngine) -> Self {
        Self {
            engine,
            evaluations: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn evaluations(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.evaluations)
    }
}

impl EngineBundle for FakeBundle {
    fn evaluate(&self) -> Result<Option<Rc<dyn DiagramEngine>>, BootstrapError> {
        self.evaluations.set(self.evaluations.get() + 1);
        Ok(Some(Rc::new(self.engine.clone())))
    }
}

/// [`EngineBundle`] whose evaluation always fails.
pub(crate) struct BrokenBundle;

impl EngineBundle for BrokenBundle {
    fn evaluate(&self) -> Result<Option<Rc<dyn DiagramEngine>>, BootstrapError> {
        Err(BootstrapError::Evaluation("unexpected token".to_owned()))
    }
}
