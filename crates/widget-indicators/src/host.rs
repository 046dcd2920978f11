//! Host abstractions used by the indicators.
//!
//! The controller never touches a real page or window directly. Everything it
//! needs from the outside world goes through the traits in this module, so a
//! browser bridge, a terminal, or a test mock can stand in for the host.

use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::error::AudioError;

/// Opaque reference to an element owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element reference from a host-specific identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Host-specific identifier of this element.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Focus transition delivered by a [`FocusBinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// The element gained focus.
    Focus,
    /// The element lost focus.
    Blur,
}

/// Callback invoked by the host on every focus transition of a watched element.
pub type FocusHandler = Arc<dyn Fn(FocusChange) + Send + Sync>;

/// Identifier of an active focus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The host document: focus state, title, and element lookup.
pub trait Document: Send + Sync {
    /// Whether the document (page or window) currently has focus.
    fn has_focus(&self) -> bool;
    /// Current document title.
    fn title(&self) -> String;
    /// Replace the document title.
    fn set_title(&self, title: &str);
    /// Resolve a selector to an element, if one exists.
    fn element(&self, selector: &str) -> Option<ElementId>;
}

/// Subscribes to focus and blur events on an element.
pub trait FocusBinder: Send + Sync {
    /// Attach `handler` to focus and blur events of `element`.
    fn subscribe(&self, element: &ElementId, handler: FocusHandler) -> SubscriptionId;
    /// Detach a subscription previously returned by [`FocusBinder::subscribe`].
    fn unsubscribe(&self, element: &ElementId, id: SubscriptionId);
}

/// Adds and removes CSS classes on an element.
pub trait ClassList: Send + Sync {
    /// Add `class` to `element`; adding a present class is a no-op.
    fn add_class(&self, element: &ElementId, class: &str);
    /// Remove `class` from `element`; removing an absent class is a no-op.
    fn remove_class(&self, element: &ElementId, class: &str);
}

/// One source entry attached to an audio resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    /// Mime type of the source, e.g. `audio/mpeg`.
    pub mime: &'static str,
    /// Location of the sound asset.
    pub url: String,
}

/// A constructed, playable audio resource.
pub trait AudioClip: Send + Sync {
    /// Start playback once. Overlapping calls may overlap playback.
    fn play(&self);
}

/// The platform audio primitive.
pub trait AudioBackend: Send + Sync {
    /// Whether audio playback exists at all on this platform.
    fn is_supported(&self) -> bool;
    /// Construct a resource with the given sources attached.
    fn create(&self, sources: &[AudioSource]) -> Result<Box<dyn AudioClip>, AudioError>;
}

/// Groups the host services so dependencies are explicit at construction sites.
#[derive(Clone)]
pub struct Host {
    /// Document focus, title and element lookup.
    pub document: Arc<dyn Document>,
    /// Focus/blur subscriptions.
    pub binder: Arc<dyn FocusBinder>,
    /// CSS class mutation.
    pub classes: Arc<dyn ClassList>,
    /// Audio primitive.
    pub audio: Arc<dyn AudioBackend>,
}

impl Host {
    /// Build a `Host` whose four services are all backed by one value.
    pub fn new<T>(inner: Arc<T>) -> Self
    where
        T: Document + FocusBinder + ClassList + AudioBackend + 'static,
    {
        Self {
            document: inner.clone(),
            binder: inner.clone(),
            classes: inner.clone(),
            audio: inner,
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
