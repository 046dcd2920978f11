//! A terminal standing in for the host page.
//!
//! The title is written with the xterm OSC 0 sequence, classes live in memory
//! and are printed when they change, and the sound cue rings the bell.

use std::{
    collections::{BTreeMap, HashMap},
    io::{self, Write},
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::{debug, info};
use widget_indicators::{
    AudioBackend, AudioClip, AudioError, AudioSource, ClassList, Document, ElementId, FocusBinder,
    FocusChange, FocusHandler, SubscriptionId,
};

/// Selector of the watched input.
pub const WIDGET: &str = "#widget";
/// Selector of the element that blinks.
pub const BLINK: &str = "#blink";

/// Write `s` to stdout and flush, logging instead of failing.
fn emit(s: &str) {
    let mut out = io::stdout().lock();
    if let Err(e) = out.write_all(s.as_bytes()).and_then(|()| out.flush()) {
        debug!(error = %e, "stdout write failed");
    }
}

/// Host state for one terminal session.
pub struct TerminalHost {
    /// Last title written.
    title: Mutex<String>,
    /// Whether the "document" is focused, toggled by `focus`/`blur`.
    focused: AtomicBool,
    /// Class list per known element.
    classes: Mutex<BTreeMap<String, Vec<String>>>,
    /// Live focus subscriptions.
    subscriptions: Mutex<HashMap<u64, (ElementId, FocusHandler)>>,
    /// Next subscription id.
    next_id: AtomicU64,
    /// Create the bell even when no sound file exists.
    bell_always: bool,
}

impl TerminalHost {
    /// A host titled `title` with the two known elements and no classes.
    pub fn new(title: &str, bell_always: bool) -> Arc<Self> {
        let classes = [WIDGET, BLINK]
            .into_iter()
            .map(|s| (s.to_string(), Vec::new()))
            .collect();
        Arc::new(Self {
            title: Mutex::new(title.to_string()),
            focused: AtomicBool::new(false),
            classes: Mutex::new(classes),
            subscriptions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            bell_always,
        })
    }

    /// Toggle document focus.
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    /// Deliver a focus change on `selector` to its subscribers. Returns how many ran.
    pub fn fire(&self, selector: &str, change: FocusChange) -> usize {
        let handlers: Vec<FocusHandler> = self
            .subscriptions
            .lock()
            .values()
            .filter(|(el, _)| el.as_str() == selector)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in &handlers {
            handler(change);
        }
        handlers.len()
    }

    /// Classes currently on `selector`.
    pub fn classes_of(&self, selector: &str) -> Vec<String> {
        self.classes
            .lock()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    /// Print the class list of `element`.
    fn show_classes(element: &ElementId, classes: &[String]) {
        println!("{element} class=\"{}\"", classes.join(" "));
    }
}

impl Document for TerminalHost {
    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    fn title(&self) -> String {
        self.title.lock().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.lock() = title.to_string();
        emit(&format!("\x1b]0;{title}\x07"));
        info!(title, "title");
    }

    fn element(&self, selector: &str) -> Option<ElementId> {
        self.classes
            .lock()
            .contains_key(selector)
            .then(|| ElementId::new(selector))
    }
}

impl FocusBinder for TerminalHost {
    fn subscribe(&self, element: &ElementId, handler: FocusHandler) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscriptions
            .lock()
            .insert(id, (element.clone(), handler));
        debug!(%element, id, "subscribed");
        SubscriptionId(id)
    }

    fn unsubscribe(&self, element: &ElementId, id: SubscriptionId) {
        self.subscriptions.lock().remove(&id.0);
        debug!(%element, id = id.0, "unsubscribed");
    }
}

impl ClassList for TerminalHost {
    fn add_class(&self, element: &ElementId, class: &str) {
        let mut all = self.classes.lock();
        let classes = all.entry(element.as_str().to_string()).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            Self::show_classes(element, classes);
        }
    }

    fn remove_class(&self, element: &ElementId, class: &str) {
        let mut all = self.classes.lock();
        if let Some(classes) = all.get_mut(element.as_str()) {
            let before = classes.len();
            classes.retain(|c| c != class);
            if classes.len() != before {
                Self::show_classes(element, classes);
            }
        }
    }
}

/// Sound cue that rings the terminal bell.
struct Bell;

impl AudioClip for Bell {
    fn play(&self) {
        emit("\x07");
        info!("bell");
    }
}

impl AudioBackend for TerminalHost {
    fn is_supported(&self) -> bool {
        true
    }

    fn create(&self, sources: &[AudioSource]) -> Result<Box<dyn AudioClip>, AudioError> {
        if self.bell_always || sources.iter().any(|s| Path::new(&s.url).exists()) {
            return Ok(Box::new(Bell));
        }
        Err(AudioError::Create(format!(
            "none of {} sound files exist",
            sources.len()
        )))
    }
}
