//! Back-navigation history rebuilt from observed page events.
//!
//! The page never tells native code what its history is.  Instead the bridge
//! infers it: every forwarded event becomes *pending*, and only when the page
//! confirms it with `PAGE_LOADED` is it pushed onto the back stack.  Going back
//! drops the top entry and re-sends the one below it.
//!
//! ```text
//! forward(A) ─▶ pending = A
//! PAGE_LOADED ─▶ stack = [A], pending = ∅
//! forward(B) ─▶ pending = B
//! PAGE_LOADED ─▶ stack = [A, B]
//! back        ─▶ stack = [A], re-send A
//! back        ─▶ stack = [],  nothing to re-send
//! ```

use cere_core::Event;

/// Back stack plus the single pending-event slot.
///
/// Invariants:
/// - the stack never contains an event that has not been confirmed;
/// - the stack only grows by one per confirmation and never underflows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    stack: Vec<Event>,
    pending: Option<Event>,
}

impl NavigationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event` as awaiting confirmation, replacing any earlier
    /// pending event.
    pub fn set_pending(&mut self, event: Event) {
        self.pending = Some(event);
    }

    /// Moves the pending event (if any) onto the stack.
    ///
    /// Returns `true` if an entry was pushed.
    pub fn confirm_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(event) => {
                self.stack.push(event);
                true
            }
            None => false,
        }
    }

    /// Steps back one entry.
    ///
    /// With more than one entry, the top is dropped and the new top is
    /// returned so the caller can re-send it.  With one entry or none, the
    /// stack is emptied and `None` is returned.
    pub fn navigate_back(&mut self) -> Option<Event> {
        if self.stack.len() > 1 {
            self.stack.pop();
            self.stack.last().cloned()
        } else {
            self.stack.clear();
            None
        }
    }

    /// `true` if [`navigate_back`](Self::navigate_back) would re-send an entry.
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Empties both the stack and the pending slot.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.pending = None;
    }

    /// Number of confirmed entries.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Confirmed entries, oldest first.
    pub fn entries(&self) -> &[Event] {
        &self.stack
    }

    pub fn pending(&self) -> Option<&Event> {
        self.pending.as_ref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
