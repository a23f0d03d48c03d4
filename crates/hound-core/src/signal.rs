//! signal.rs — multi-listener notification
//!
//! Invariants:
//! - `raise` dispatches to the listeners tapped when it was called; taps and
//!   untaps made by a listener during dispatch apply from the next raise on.
//! - Tapping from inside a listener therefore always terminates.
//!
//! Listeners live behind an `Rc` snapshot that is replaced (never mutated)
//! on tap/untap, so a dispatch in progress keeps iterating its own copy.
//! Single-threaded by construction, like the page that owns it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Signal::tap`], used to untap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapId(u64);

/// A collection of listeners notified with a payload of type `T`.
pub struct Signal<T: ?Sized> {
    listeners: RefCell<Rc<Vec<(TapId, Rc<dyn Fn(&T)>)>>>,
    next_id: Cell<u64>,
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Rc::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin listening with `listener`.
    pub fn tap(&self, listener: impl Fn(&T) + 'static) -> TapId {
        let id = TapId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut listeners = self.listeners.borrow_mut();
        let mut next = Vec::with_capacity(listeners.len() + 1);
        next.extend(listeners.iter().cloned());
        next.push((id, Rc::new(listener) as Rc<dyn Fn(&T)>));
        *listeners = Rc::new(next);
        id
    }

    /// Stop notifying the listener behind `id`. Returns false if it was not
    /// tapped, leaving the listeners unchanged.
    pub fn untap(&self, id: TapId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|(tap, _)| *tap == id) {
            return false;
        }
        let next: Vec<_> = listeners
            .iter()
            .filter(|(tap, _)| *tap != id)
            .cloned()
            .collect();
        *listeners = Rc::new(next);
        true
    }

    /// Call every currently tapped listener with `payload`.
    pub fn raise(&self, payload: &T) {
        let snapshot = Rc::clone(&self.listeners.borrow());
        for (_, listener) in snapshot.iter() {
            listener(payload);
        }
    }

    /// Number of tapped listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
