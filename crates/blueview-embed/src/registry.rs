//! Process-wide collection of live render instances.

use std::collections::HashMap;

use crate::instance::{InstanceId, RenderInstance};

/// All live render instances, keyed by id.
///
/// Entries are added as blocks are processed and removed when an instance is
/// stopped — individually via the host's per-block disposal hook, or en masse
/// on whole-system unload.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: HashMap<InstanceId, RenderInstance>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its own id.
    pub fn insert(&mut self, instance: RenderInstance) {
        self.instances.insert(instance.id(), instance);
    }

    /// Deregister and return an instance.
    pub fn remove(&mut self, id: InstanceId) -> Option<RenderInstance> {
        self.instances.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&RenderInstance> {
        self.instances.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut RenderInstance> {
        self.instances.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drain every instance for a teardown sweep.
    pub fn drain(&mut self) -> impl Iterator<Item = RenderInstance> + '_ {
        self.instances.drain().map(|(_, instance)| instance)
    }
}
