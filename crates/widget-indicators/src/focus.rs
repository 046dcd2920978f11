use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::host::{ElementId, FocusBinder, FocusChange, FocusHandler, SubscriptionId};

/// An active focus subscription.
#[derive(Debug)]
struct Binding {
    /// Element the subscription is attached to.
    element: ElementId,
    /// Id returned by the binder.
    id: SubscriptionId,
}

/// Tracks whether the watched element currently has focus.
///
/// The flag is written only by the handler handed to the [`FocusBinder`]; all
/// other code reads it.
#[derive(Debug, Default)]
pub struct FocusTracker {
    /// Last focus state reported for the watched element.
    focused: Arc<AtomicBool>,
    /// Present exactly while the handler is subscribed.
    binding: Mutex<Option<Binding>>,
}

impl FocusTracker {
    /// Whether the watched element is focused.
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    /// Whether focus events are currently subscribed.
    pub fn is_bound(&self) -> bool {
        self.binding.lock().is_some()
    }

    /// Subscribe to focus events on `element`. Returns false if already bound.
    pub fn bind(&self, binder: &dyn FocusBinder, element: &ElementId) -> bool {
        let mut binding = self.binding.lock();
        if binding.is_some() {
            trace!(element = %element, "focus already bound");
            return false;
        }
        let focused = self.focused.clone();
        let handler: FocusHandler = Arc::new(move |change| {
            focused.store(change == FocusChange::Focus, Ordering::SeqCst);
            trace!(?change, "widget focus change");
        });
        let id = binder.subscribe(element, handler);
        debug!(element = %element, id = id.0, "focus bound");
        *binding = Some(Binding {
            element: element.clone(),
            id,
        });
        true
    }

    /// Drop the focus subscription. Returns false if nothing was bound.
    pub fn unbind(&self, binder: &dyn FocusBinder) -> bool {
        match self.binding.lock().take() {
            Some(Binding { element, id }) => {
                binder.unsubscribe(&element, id);
                debug!(element = %element, id = id.0, "focus unbound");
                true
            }
            None => false,
        }
    }
}
