//! Scripted surfaces shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use surface_pool::{BufferId, Surface, SurfaceFactory, SurfaceSize, WritesFinished};

/// Switches for one surface, reachable after the surface moved into the pool.
#[derive(Debug)]
pub struct Control {
    pub valid: AtomicBool,
    pub oversized: AtomicBool,
    pub age: AtomicU32,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            valid: AtomicBool::new(true),
            oversized: AtomicBool::new(false),
            age: AtomicU32::new(0),
        }
    }
}

/// Everything the fake factory has handed out, and the hooks waiting on it.
#[derive(Clone, Default)]
pub struct Tracker {
    controls: Arc<Mutex<HashMap<BufferId, Arc<Control>>>>,
    live: Arc<Mutex<HashSet<BufferId>>>,
    hooks: Arc<Mutex<HashMap<BufferId, WritesFinished>>>,
    fail_creation: Arc<AtomicBool>,
}

impl Tracker {
    pub fn factory(&self) -> ScriptedFactory {
        ScriptedFactory {
            tracker: self.clone(),
        }
    }

    pub fn control(&self, id: BufferId) -> Arc<Control> {
        Arc::clone(&self.controls.lock().unwrap()[&id])
    }

    pub fn set_fail_creation(&self, fail: bool) {
        self.fail_creation.store(fail, Ordering::SeqCst);
    }

    /// Surfaces that exist right now, wherever they are owned.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn is_live(&self, id: BufferId) -> bool {
        self.live.lock().unwrap().contains(&id)
    }

    /// Ids with a registered but unfired completion hook.
    pub fn waiting(&self) -> Vec<BufferId> {
        let mut ids: Vec<_> = self.hooks.lock().unwrap().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Take the hook for `id` so it can be fired elsewhere.
    pub fn take_hook(&self, id: BufferId) -> Option<WritesFinished> {
        self.hooks.lock().unwrap().remove(&id)
    }

    /// Fire the hook for `id` on the current thread.
    pub fn finish(&self, id: BufferId) -> bool {
        match self.take_hook(id) {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }
}

pub struct ScriptedSurface {
    id: BufferId,
    size: SurfaceSize,
    control: Arc<Control>,
    tracker: Tracker,
}

impl Surface for ScriptedSurface {
    fn buffer_id(&self) -> BufferId {
        self.id
    }

    fn is_valid(&self) -> bool {
        self.control.valid.load(Ordering::SeqCst)
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn allocation_size(&self) -> usize {
        let factor = if self.is_oversized() { 2 } else { 1 };
        self.size.area() as usize * 4 * factor
    }

    fn advance_and_get_age(&mut self) -> u32 {
        self.control.age.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_oversized(&self) -> bool {
        self.control.oversized.load(Ordering::SeqCst)
    }

    fn has_stable_size_history(&self) -> bool {
        true
    }

    fn flush_pending_sync(&mut self) -> bool {
        self.control.age.store(0, Ordering::SeqCst);
        true
    }

    fn on_writes_finished(&mut self, callback: WritesFinished) {
        self.tracker.hooks.lock().unwrap().insert(self.id, callback);
    }
}

impl Drop for ScriptedSurface {
    fn drop(&mut self) {
        self.tracker.live.lock().unwrap().remove(&self.id);
    }
}

pub struct ScriptedFactory {
    tracker: Tracker,
}

impl SurfaceFactory for ScriptedFactory {
    type Surface = ScriptedSurface;

    fn create(&mut self, size: SurfaceSize, id: BufferId) -> Option<ScriptedSurface> {
        if self.tracker.fail_creation.load(Ordering::SeqCst) {
            return None;
        }
        let control = Arc::new(Control::default());
        self.tracker
            .controls
            .lock()
            .unwrap()
            .insert(id, Arc::clone(&control));
        self.tracker.live.lock().unwrap().insert(id);
        Some(ScriptedSurface {
            id,
            size,
            control,
            tracker: self.tracker.clone(),
        })
    }
}
