//! Block processing and whole-system lifecycle.
//!
//! [`BlueprintProcessor`] is the host-facing entry point: the host registers
//! it against [`BLOCK_TAG`] and invokes [`process_block`] once per discovered
//! block, wiring the returned id into its per-block disposal hook. On full
//! unload, [`unload`] sweeps every live instance and releases the cached
//! engine capability so the process ends in its pre-load state.
//!
//! [`process_block`]: BlueprintProcessor::process_block
//! [`unload`]: BlueprintProcessor::unload

use std::cell::RefCell;
use std::rc::Rc;

use blueview_engine::{EngineBundle, EngineLoader};
use blueview_host::{BlockElement, ListenerRegistry};
use blueview_settings::{SettingsBackend, SettingsStore};

use crate::instance::{InstanceId, RenderInstance};
use crate::registry::InstanceRegistry;
use crate::resize::ResizeController;

/// The fenced-code-block tag that triggers rendering.
pub const BLOCK_TAG: &str = "blueprint";

/// Owns everything with process lifetime: the engine loader, the settings
/// store, the pointer-listener registry, and the live instances.
pub struct BlueprintProcessor {
    loader: EngineLoader,
    settings: Rc<RefCell<SettingsStore>>,
    listeners: Rc<ListenerRegistry>,
    registry: InstanceRegistry,
}

impl BlueprintProcessor {
    /// Set up the processor: load settings and prepare the (not yet
    /// evaluated) engine bundle.
    #[must_use]
    pub fn new(bundle: Box<dyn EngineBundle>, backend: Box<dyn SettingsBackend>) -> Self {
        Self {
            loader: EngineLoader::new(bundle),
            settings: Rc::new(RefCell::new(SettingsStore::load(backend))),
            listeners: ListenerRegistry::new(),
            registry: InstanceRegistry::new(),
        }
    }

    /// Handle one discovered block: build, start, and register an instance.
    ///
    /// The engine is loaded on the first call. If it cannot be loaded the
    /// instance is registered in failed state with an inline message — one
    /// block failing never affects the others. The returned id is what the
    /// host's per-block disposal hook passes to
    /// [`dispose_block`](Self::dispose_block).
    pub fn process_block(&mut self, source: &str, element: Box<dyn BlockElement>) -> InstanceId {
        let id = InstanceId::new();
        let settings = self.settings.borrow().settings();

        let mut instance = match self.loader.ensure_ready() {
            Ok(engine) => RenderInstance::create(id, source, element, engine.as_ref(), &settings),
            Err(e) => {
                tracing::error!(%id, "engine unavailable: {e}");
                RenderInstance::failed(id, source, element, &e.to_string())
            }
        };
        instance.start();

        // The resize handle works regardless of whether rendering succeeded.
        if let Some(surface) = instance.surface() {
            instance.attach_resize(ResizeController::new(
                surface,
                Rc::clone(&self.settings),
                Rc::clone(&self.listeners),
            ));
        }

        self.registry.insert(instance);
        id
    }

    /// Per-block disposal hook: stop one instance and deregister it.
    pub fn dispose_block(&mut self, id: InstanceId) {
        if let Some(mut instance) = self.registry.remove(id) {
            instance.stop();
        }
    }

    /// Whole-system unload: stop every live instance, clear the registry,
    /// and release the cached engine capability.
    ///
    /// Per-instance teardown problems are logged inside `stop` and never
    /// abort the sweep.
    pub fn unload(&mut self) {
        let count = self.registry.len();
        for mut instance in self.registry.drain() {
            instance.stop();
        }
        self.loader.release();
        tracing::debug!("unloaded {count} render instances");
    }

    #[must_use]
    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InstanceRegistry {
        &mut self.registry
    }

    /// The shared settings store, e.g. for a host settings panel.
    #[must_use]
    pub fn settings(&self) -> Rc<RefCell<SettingsStore>> {
        Rc::clone(&self.settings)
    }

    /// The document-wide pointer-listener registry.
    #[must_use]
    pub fn listeners(&self) -> Rc<ListenerRegistry> {
        Rc::clone(&self.listeners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceState;
    use crate::testutil::{BrokenBundle, FakeBundle, FakeEngine};
    use blueview_host::{HeadlessElement, HeadlessProbe, Surface};
    use blueview_settings::MemoryBackend;
    use pretty_assertions::assert_eq;

    fn processor_with(engine: &FakeEngine, backend: &MemoryBackend) -> BlueprintProcessor {
        BlueprintProcessor::new(
            Box::new(FakeBundle::new(engine.clone())),
            Box::new(backend.clone()),
        )
    }

    fn block(processor: &mut BlueprintProcessor, source: &str) -> (InstanceId, HeadlessProbe) {
        let element = HeadlessElement::new();
        let probe = element.probe();
        let id = processor.process_block(source, Box::new(element));
        (id, probe)
    }

    #[test]
    fn test_block_tag() {
        assert_eq!(BLOCK_TAG, "blueprint");
    }

    #[test]
    fn test_engine_loaded_once_across_blocks() {
        let engine = FakeEngine::new();
        let bundle = FakeBundle::new(engine.clone());
        let evaluations = bundle.evaluations();
        let mut processor =
            BlueprintProcessor::new(Box::new(bundle), Box::new(MemoryBackend::new()));

        for _ in 0..4 {
            block(&mut processor, "Begin Object");
        }

        assert_eq!(evaluations.get(), 1);
        assert_eq!(engine.created(), 4);
        assert_eq!(processor.registry().len(), 4);
    }

    #[test]
    fn test_failure_and_success_are_independent() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        engine.fail_next_start("Invalid pin reference");
        let mut processor = processor_with(&engine, &backend);

        let (first, first_probe) = block(&mut processor, "Begin Bad");
        let (second, second_probe) = block(&mut processor, "Begin Good");

        let registry = processor.registry();
        assert_eq!(registry.get(first).unwrap().state(), InstanceState::Failed);
        assert_eq!(registry.get(second).unwrap().state(), InstanceState::Running);

        let first_surface = first_probe.surface().unwrap();
        assert_eq!(
            first_surface.borrow().error(),
            Some("Invalid pin reference")
        );
        let second_surface = second_probe.surface().unwrap();
        assert_eq!(second_surface.borrow().error(), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_broken_bundle_registers_failed_instances() {
        let mut processor = BlueprintProcessor::new(
            Box::new(BrokenBundle),
            Box::new(MemoryBackend::new()),
        );

        let (first, first_probe) = block(&mut processor, "Begin Object");
        let (_second, second_probe) = block(&mut processor, "Begin Object");

        assert_eq!(
            processor.registry().get(first).unwrap().state(),
            InstanceState::Failed
        );
        assert_eq!(
            first_probe.errors(),
            vec!["engine bundle evaluation failed: unexpected token".to_owned()]
        );
        // The failed load is sticky; later blocks report unavailability
        assert_eq!(
            second_probe.errors(),
            vec!["engine failed to initialize earlier in this session".to_owned()]
        );
        assert_eq!(processor.registry().len(), 2);
    }

    #[test]
    fn test_dispose_block_stops_and_deregisters() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        let mut processor = processor_with(&engine, &backend);

        let (id, _probe) = block(&mut processor, "Begin Object");
        processor.dispose_block(id);

        assert!(processor.registry().is_empty());
        assert_eq!(engine.stops(), 1);

        // Disposing again is a no-op
        processor.dispose_block(id);
        assert_eq!(engine.stops(), 1);
    }

    #[test]
    fn test_unload_sweeps_all_instances() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        engine.fail_next_start("bad graph");
        engine.fail_stop();
        let mut processor = processor_with(&engine, &backend);

        // One Failed and two Running instances; every stop reports an error
        block(&mut processor, "Begin Bad");
        block(&mut processor, "Begin Good");
        block(&mut processor, "Begin Good");
        assert_eq!(processor.registry().len(), 3);

        processor.unload();

        assert!(processor.registry().is_empty());
        assert_eq!(engine.stops(), 3);
    }

    #[test]
    fn test_unload_mid_drag_releases_listeners() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        let mut processor = processor_with(&engine, &backend);
        let listeners = processor.listeners();

        let (id, _probe) = block(&mut processor, "Begin Object");
        let resize = processor
            .registry_mut()
            .get_mut(id)
            .unwrap()
            .resize_mut()
            .unwrap();
        resize.pointer_down(0);
        assert_eq!(listeners.active(), 1);

        processor.unload();
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn test_resize_attached_even_when_render_fails() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        engine.fail_next_start("bad graph");
        let mut processor = processor_with(&engine, &backend);

        let (id, _probe) = block(&mut processor, "Begin Bad");
        assert!(
            processor
                .registry_mut()
                .get_mut(id)
                .unwrap()
                .resize_mut()
                .is_some()
        );
    }

    #[test]
    fn test_resize_commit_flows_into_settings() {
        let engine = FakeEngine::new();
        let backend = MemoryBackend::new();
        let mut processor = processor_with(&engine, &backend);

        let (id, _probe) = block(&mut processor, "Begin Object");
        {
            let resize = processor
                .registry_mut()
                .get_mut(id)
                .unwrap()
                .resize_mut()
                .unwrap();
            resize.pointer_down(0);
            resize.pointer_move(150);
            resize.pointer_up();
        }

        assert_eq!(processor.settings().borrow().settings().default_height, 550);
        assert_eq!(
            backend.record().unwrap(),
            r#"{"minHeight":200,"maxHeight":800,"defaultHeight":550}"#
        );

        // The next block starts at the committed height
        let (_next, next_probe) = block(&mut processor, "Begin Object");
        assert_eq!(next_probe.surface().unwrap().borrow().height(), 550);
    }

    #[test]
    fn test_deferred_completions_resolve_independently() {
        let engine = FakeEngine::new().deferred();
        let backend = MemoryBackend::new();
        let mut processor = processor_with(&engine, &backend);

        let (first, _p1) = block(&mut processor, "Begin A");
        let (second, _p2) = block(&mut processor, "Begin B");
        assert_eq!(
            processor.registry().get(first).unwrap().state(),
            InstanceState::Starting
        );

        // Completions arrive in creation order here, but nothing depends on it
        engine.complete_next(Ok(()));
        engine.complete_next(Err(blueview_engine::RenderFailure::default()));

        assert_eq!(
            processor.registry().get(first).unwrap().state(),
            InstanceState::Running
        );
        assert_eq!(
            processor.registry().get(second).unwrap().state(),
            InstanceState::Failed
        );
    }
}
