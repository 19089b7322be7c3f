//! Optional process-wide bridge instance.
//!
//! Platforms whose web view callbacks cannot carry an owner pointer need one
//! shared bridge.  This module provides it: construction is lazy and guarded
//! by a mutex, so concurrent first access yields exactly one instance, and a
//! logout releases it so the next access builds a fresh bridge.
//!
//! Hosts that can pass an `Arc<BridgeCore>` around explicitly do not need
//! this module at all.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::bridge_core::BridgeCore;

static SHARED: Mutex<Option<Arc<BridgeCore>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<BridgeCore>>> {
    SHARED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the shared bridge, constructing it with `make` on first access.
///
/// `make` runs under the instance lock and must not call back into this
/// module.
pub fn shared_or_init<F>(make: F) -> Arc<BridgeCore>
where
    F: FnOnce() -> BridgeCore,
{
    let mut slot = slot();
    if let Some(core) = slot.as_ref() {
        return Arc::clone(core);
    }
    let core = Arc::new(make());
    *slot = Some(Arc::clone(&core));
    core
}

/// Returns the shared bridge if one is currently registered.
pub fn shared() -> Option<Arc<BridgeCore>> {
    slot().clone()
}

/// Releases the shared slot if it holds `core`.  Returns whether it did.
pub(crate) fn release(core: &BridgeCore) -> bool {
    let mut slot = slot();
    match slot.as_ref() {
        Some(current) if std::ptr::eq(Arc::as_ptr(current), core) => {
            *slot = None;
            true
        }
        _ => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
