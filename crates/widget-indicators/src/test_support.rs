//! Test support utilities for widget-indicators unit and integration tests.
//! These helpers are public to avoid dead_code warnings and are lightweight.
//! They are intended for use by the test suite only.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    error::AudioError,
    host::{
        AudioBackend, AudioClip, AudioSource, ClassList, Document, ElementId, FocusBinder,
        FocusChange, FocusHandler, Host, SubscriptionId,
    },
};

/// Recording mock of every host service.
///
/// Elements exist once registered with [`MockHost::add_element`]. Calls are
/// recorded by name so tests can assert on them.
#[derive(Default)]
pub struct MockHost {
    calls: Mutex<Vec<String>>,
    title: Mutex<String>,
    has_focus: AtomicBool,
    elements: Mutex<BTreeMap<String, Vec<String>>>,
    subscriptions: Mutex<HashMap<u64, (ElementId, FocusHandler)>>,
    next_subscription: AtomicU64,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: AtomicUsize,
    audio_unsupported: AtomicBool,
    fail_audio: AtomicBool,
    audio_created: AtomicUsize,
    plays: Arc<AtomicUsize>,
    last_sources: Mutex<Vec<AudioSource>>,
}

impl MockHost {
    /// A new host with the given document title, unfocused, with audio support.
    pub fn new(title: &str) -> Arc<Self> {
        let host = Self::default();
        *host.title.lock() = title.to_string();
        Arc::new(host)
    }

    /// Bundle this mock as a [`Host`].
    pub fn host(self: &Arc<Self>) -> Host {
        Host::new(self.clone())
    }

    /// Register an element with an initial set of classes.
    pub fn add_element(&self, id: &str, classes: &[&str]) -> ElementId {
        self.elements.lock().insert(
            id.to_string(),
            classes.iter().map(|c| c.to_string()).collect(),
        );
        ElementId::new(id)
    }

    /// Simulate the document gaining or losing focus.
    pub fn set_document_focus(&self, focused: bool) {
        self.has_focus.store(focused, Ordering::SeqCst);
    }

    /// Deliver a focus change to every subscription on `element`.
    pub fn fire(&self, element: &ElementId, change: FocusChange) {
        let handlers: Vec<FocusHandler> = self
            .subscriptions
            .lock()
            .values()
            .filter(|(el, _)| el == element)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(change);
        }
    }

    /// Make the audio primitive report itself as unsupported.
    pub fn set_audio_unsupported(&self, v: bool) {
        self.audio_unsupported.store(v, Ordering::SeqCst);
    }

    /// Make audio resource construction fail.
    pub fn set_fail_audio(&self, v: bool) {
        self.fail_audio.store(v, Ordering::SeqCst);
    }

    /// Change the document title without recording a call, as the page itself would.
    pub fn replace_title(&self, title: &str) {
        *self.title.lock() = title.to_string();
    }

    /// Current document title.
    pub fn current_title(&self) -> String {
        self.title.lock().clone()
    }

    /// Classes currently on `element`, in insertion order.
    pub fn classes_of(&self, element: &ElementId) -> Vec<String> {
        self.elements
            .lock()
            .get(element.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `element` carries `class`.
    pub fn has_class(&self, element: &ElementId, class: &str) -> bool {
        self.classes_of(element).iter().any(|c| c == class)
    }

    /// Number of live focus subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Number of times `subscribe` was called.
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    /// Number of times `unsubscribe` was called.
    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    /// Number of audio resources created successfully.
    pub fn audio_created(&self) -> usize {
        self.audio_created.load(Ordering::SeqCst)
    }

    /// Number of times any created audio resource was played.
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    /// Sources passed to the most recent audio creation attempt.
    pub fn last_sources(&self) -> Vec<AudioSource> {
        self.last_sources.lock().clone()
    }

    /// Whether a call with this name was recorded.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    /// Number of recorded calls with this name.
    pub fn call_count(&self, s: &str) -> usize {
        self.calls.lock().iter().filter(|x| *x == s).count()
    }

    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

impl Document for MockHost {
    fn has_focus(&self) -> bool {
        self.has_focus.load(Ordering::SeqCst)
    }
    fn title(&self) -> String {
        self.current_title()
    }
    fn set_title(&self, title: &str) {
        self.note("set_title");
        *self.title.lock() = title.to_string();
    }
    fn element(&self, selector: &str) -> Option<ElementId> {
        self.elements
            .lock()
            .contains_key(selector)
            .then(|| ElementId::new(selector))
    }
}

impl FocusBinder for MockHost {
    fn subscribe(&self, element: &ElementId, handler: FocusHandler) -> SubscriptionId {
        self.note("subscribe");
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscriptions
            .lock()
            .insert(id, (element.clone(), handler));
        SubscriptionId(id)
    }
    fn unsubscribe(&self, _element: &ElementId, id: SubscriptionId) {
        self.note("unsubscribe");
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.subscriptions.lock().remove(&id.0);
    }
}

impl ClassList for MockHost {
    fn add_class(&self, element: &ElementId, class: &str) {
        self.note("add_class");
        let mut elements = self.elements.lock();
        let classes = elements.entry(element.as_str().to_string()).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    fn remove_class(&self, element: &ElementId, class: &str) {
        self.note("remove_class");
        if let Some(classes) = self.elements.lock().get_mut(element.as_str()) {
            classes.retain(|c| c != class);
        }
    }
}

/// Audio resource handed out by [`MockHost`]; counts plays on the host.
struct MockClip {
    plays: Arc<AtomicUsize>,
}

impl AudioClip for MockClip {
    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

impl AudioBackend for MockHost {
    fn is_supported(&self) -> bool {
        !self.audio_unsupported.load(Ordering::SeqCst)
    }
    fn create(&self, sources: &[AudioSource]) -> Result<Box<dyn AudioClip>, AudioError> {
        self.note("create_audio");
        *self.last_sources.lock() = sources.to_vec();
        if self.fail_audio.load(Ordering::SeqCst) {
            return Err(AudioError::Create("not implemented".into()));
        }
        self.audio_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockClip {
            plays: self.plays.clone(),
        }))
    }
}
