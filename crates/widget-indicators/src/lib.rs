//! Widget Indicators
//!
//! Draws the user's attention back to a widget once it has lost focus:
//! - blinks the document title while the document is unfocused
//! - blinks a CSS class on an element while the watched element is unfocused
//! - plays a notification sound unless the user is actively engaged
//!
//! Every indicator cancels itself on the first tick after focus returns.
//!
//! The crate exposes a small API:
//! - [`Indicators`]: the controller you construct and drive
//! - [`Options`]: its configuration, with [`Options::from_value`] for loose JSON input
//! - the [`host`] traits the embedding application implements
//!
//! Timers run on Tokio; construct the controller inside a runtime or pass a
//! [`Handle`] explicitly.
use std::{
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info, trace, warn};

mod blink;
mod error;
mod focus;
pub mod host;
pub mod options;
mod sound;
pub mod test_support;
mod ticker;

pub use error::{AudioError, COMPONENT, Error, Result};
pub use host::{
    AudioBackend, AudioClip, AudioSource, ClassList, Document, ElementId, FocusBinder,
    FocusChange, FocusHandler, Host, SubscriptionId,
};
pub use options::{Options, SoundUrls};
pub use sound::{MP3_MIME, OGG_MIME};

use blink::BlinkSlot;
use focus::FocusTracker;
use ticker::TickFlow;

/// CSS class toggled on the blink element.
pub const BLINK_CLASS: &str = "gi-widget-blink";

/// Tick period of both blinkers.
pub const BLINK_PERIOD: Duration = Duration::from_millis(1000);

/// Why an emitter did nothing on a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The controller is disabled.
    Disabled,
    /// No blink text was supplied.
    NoText,
    /// Blink text was supplied but empty.
    MissingText,
    /// The `windowBlink` option is off.
    WindowBlinkOff,
    /// The document has focus.
    DocumentFocused,
    /// No widget/blink element is configured.
    NoWidget,
    /// The watched element has focus.
    WidgetFocused,
    /// The `playSound` option is off.
    SoundOff,
    /// No audio resource exists.
    NoAudio,
    /// Document and watched element both have focus.
    UserEngaged,
}

/// Result of one emitter on a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A blink started.
    Started,
    /// A blink was already running; nothing changed.
    AlreadyBlinking,
    /// The sound was played.
    Played,
    /// The emitter did nothing.
    Skipped(Skip),
}

/// Per-emitter outcome of [`Indicators::trigger`], in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerReport {
    /// Window-title blinker.
    pub title: Outcome,
    /// Element-class blinker.
    pub widget: Outcome,
    /// Sound player.
    pub sound: Outcome,
}

impl TriggerReport {
    /// Report for a trigger on which every emitter skipped for the same reason.
    fn skipped(reason: Skip) -> Self {
        Self {
            title: Outcome::Skipped(reason),
            widget: Outcome::Skipped(reason),
            sound: Outcome::Skipped(reason),
        }
    }

    /// Non-fatal signal raised by this trigger, if any.
    pub fn signal(&self) -> Option<Error> {
        (self.title == Outcome::Skipped(Skip::MissingText)).then_some(Error::MissingBlinkText)
    }
}

/// Mutable runtime state, guarded by one lock.
struct State {
    /// Whether triggers are honoured.
    enabled: bool,
    /// Audio resource; present only while enabled and audio is available.
    audio: Option<Box<dyn AudioClip>>,
    /// Title blinker; restore data is the original title.
    window_blink: BlinkSlot<String>,
    /// Element blinker; restore data is the element carrying the class.
    widget_blink: BlinkSlot<ElementId>,
}

/// Shared controller internals. Ticks hold a `Weak` to this.
struct Inner {
    /// Validated configuration.
    options: Options,
    /// Host services.
    host: Host,
    /// Runtime the blink tickers are spawned on.
    runtime: Handle,
    /// Watched-element focus.
    focus: FocusTracker,
    /// Runtime state.
    state: Mutex<State>,
}

/// Focus-loss indicator controller.
///
/// Construct via [`Indicators::new`], then call [`Indicators::trigger`] whenever
/// something happens that the user should notice. Cloning yields another handle
/// to the same controller; dropping the last handle tears everything down.
#[derive(Clone)]
pub struct Indicators {
    /// Shared internals.
    inner: Arc<Inner>,
}

impl Indicators {
    /// Create a controller on the current Tokio runtime.
    ///
    /// Enables the controller immediately unless `options.enabled` is false.
    pub fn new(options: Options, host: Host) -> Result<Self> {
        let options = options.validate()?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Self::with_runtime(options, host, runtime)
    }

    /// Create a controller whose timers run on `runtime`.
    pub fn with_runtime(options: Options, host: Host, runtime: Handle) -> Result<Self> {
        let options = options.validate()?;
        let enabled = options.enabled;
        let this = Self {
            inner: Arc::new(Inner {
                options,
                host,
                runtime,
                focus: FocusTracker::default(),
                state: Mutex::new(State {
                    enabled: false,
                    audio: None,
                    window_blink: BlinkSlot::default(),
                    widget_blink: BlinkSlot::default(),
                }),
            }),
        };
        if enabled {
            this.enable();
        }
        Ok(this)
    }

    /// Validate a loose JSON configuration and create a controller from it.
    pub fn from_value(value: &Value, host: Host) -> Result<Self> {
        let options = Options::from_value(value, host.document.as_ref())?;
        Self::new(options, host)
    }

    /// Enable the controller: create the audio resource and bind focus tracking.
    ///
    /// Safe to call repeatedly; focus events are never bound twice.
    pub fn enable(&self) {
        let inner = &self.inner;
        let audio = sound::create(inner.host.audio.as_ref(), &inner.options.sound_urls);
        if let Some(widget) = &inner.options.widget_element {
            inner.focus.bind(inner.host.binder.as_ref(), widget);
        }
        let mut st = inner.state.lock();
        st.audio = audio;
        st.enabled = true;
        debug!(audio = st.audio.is_some(), "indicators enabled");
    }

    /// Disable the controller: release audio, unbind focus tracking and cancel
    /// running blinks, restoring the title and the blink element.
    pub fn disable(&self) {
        self.inner.teardown();
        debug!("indicators disabled");
    }

    /// Fire the indicators. `text` is shown in the blinking title.
    ///
    /// Does nothing while disabled. Otherwise tries the title blink (only when
    /// `text` is given), then the element blink, then the sound.
    pub fn trigger(&self, text: Option<&str>) -> TriggerReport {
        let mut st = self.inner.state.lock();
        if !st.enabled {
            trace!("trigger ignored; disabled");
            return TriggerReport::skipped(Skip::Disabled);
        }
        let title = match text {
            Some(text) => self.window_blink(&mut st, text),
            None => Outcome::Skipped(Skip::NoText),
        };
        let widget = self.widget_blink(&mut st);
        let sound = self.inner.play_sound(&st);
        let report = TriggerReport {
            title,
            widget,
            sound,
        };
        trace!(?report, "trigger");
        report
    }

    /// Whether the controller is enabled.
    pub fn is_enabled(&self) -> bool {
        self.inner.state.lock().enabled
    }

    /// Whether the watched element currently has focus.
    pub fn is_widget_focused(&self) -> bool {
        self.inner.focus.is_focused()
    }

    /// Whether focus events on the watched element are subscribed.
    pub fn is_focus_bound(&self) -> bool {
        self.inner.focus.is_bound()
    }

    /// Whether the title is blinking.
    pub fn is_window_blinking(&self) -> bool {
        self.inner.state.lock().window_blink.is_blinking()
    }

    /// Whether the blink element is blinking.
    pub fn is_widget_blinking(&self) -> bool {
        self.inner.state.lock().widget_blink.is_blinking()
    }

    /// Whether an audio resource exists. False means sound is off for now.
    pub fn has_audio(&self) -> bool {
        self.inner.state.lock().audio.is_some()
    }

    /// The validated configuration.
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Start the title blink if eligible.
    fn window_blink(&self, st: &mut State, text: &str) -> Outcome {
        let inner = &self.inner;
        if !inner.options.window_blink {
            return Outcome::Skipped(Skip::WindowBlinkOff);
        }
        let document = &inner.host.document;
        if document.has_focus() {
            return Outcome::Skipped(Skip::DocumentFocused);
        }
        if text.is_empty() {
            warn!(error = %Error::MissingBlinkText, "title blink skipped");
            return Outcome::Skipped(Skip::MissingText);
        }
        if st.window_blink.is_blinking() {
            return Outcome::AlreadyBlinking;
        }

        let original = document.title();
        document.set_title(text);

        let generation = st.window_blink.reserve();
        let weak = Arc::downgrade(inner);
        let frames = (original.clone(), text.to_string());
        let mut show_original = true;
        let ticker = ticker::spawn(
            &inner.runtime,
            "window_blink",
            BLINK_PERIOD,
            BLINK_PERIOD,
            move || {
                with_inner(&weak, |inner| {
                    inner.window_tick(generation, &frames, &mut show_original)
                })
            },
        );
        st.window_blink.start(ticker, generation, original);
        debug!(text = %text, "title blink started");
        Outcome::Started
    }

    /// Start the element blink if eligible.
    fn widget_blink(&self, st: &mut State) -> Outcome {
        let inner = &self.inner;
        let Some(element) = inner
            .options
            .widget_element
            .as_ref()
            .and(inner.options.blink_element.clone())
        else {
            return Outcome::Skipped(Skip::NoWidget);
        };
        if inner.focus.is_focused() {
            return Outcome::Skipped(Skip::WidgetFocused);
        }
        if st.widget_blink.is_blinking() {
            return Outcome::AlreadyBlinking;
        }

        inner.host.classes.add_class(&element, BLINK_CLASS);

        let generation = st.widget_blink.reserve();
        let weak = Arc::downgrade(inner);
        let target = element.clone();
        let mut marked = true;
        let ticker = ticker::spawn(
            &inner.runtime,
            "widget_blink",
            BLINK_PERIOD,
            BLINK_PERIOD,
            move || with_inner(&weak, |inner| inner.widget_tick(generation, &target, &mut marked)),
        );
        debug!(element = %element, "element blink started");
        st.widget_blink.start(ticker, generation, element);
        Outcome::Started
    }
}

/// Run `f` against the controller if it still exists; stop ticking otherwise.
fn with_inner(weak: &Weak<Inner>, f: impl FnOnce(&Inner) -> TickFlow) -> TickFlow {
    match weak.upgrade() {
        Some(inner) => f(&inner),
        None => TickFlow::Stop,
    }
}

impl Inner {
    /// One title tick: cancel on document focus, otherwise alternate the title.
    fn window_tick(
        &self,
        generation: u64,
        (original, text): &(String, String),
        show_original: &mut bool,
    ) -> TickFlow {
        let mut st = self.state.lock();
        if !st.window_blink.is_current(generation) {
            return TickFlow::Stop;
        }
        let document = &self.host.document;
        if document.has_focus() {
            if let Some(title) = st.window_blink.stop() {
                document.set_title(&title);
            }
            debug!("title blink cancelled; document focused");
            return TickFlow::Stop;
        }
        let frame = if *show_original { original } else { text };
        document.set_title(frame);
        *show_original = !*show_original;
        trace!(title = %frame, "title blink tick");
        TickFlow::Continue
    }

    /// One element tick: cancel on widget focus, otherwise toggle the class.
    fn widget_tick(&self, generation: u64, element: &ElementId, marked: &mut bool) -> TickFlow {
        let mut st = self.state.lock();
        if !st.widget_blink.is_current(generation) {
            return TickFlow::Stop;
        }
        let classes = &self.host.classes;
        if self.focus.is_focused() {
            if let Some(element) = st.widget_blink.stop() {
                classes.remove_class(&element, BLINK_CLASS);
            }
            debug!(element = %element, "element blink cancelled; widget focused");
            return TickFlow::Stop;
        }
        if *marked {
            classes.remove_class(element, BLINK_CLASS);
        } else {
            classes.add_class(element, BLINK_CLASS);
        }
        *marked = !*marked;
        trace!(element = %element, marked = *marked, "element blink tick");
        TickFlow::Continue
    }

    /// Play the sound once unless it is off, unavailable, or the user is engaged.
    fn play_sound(&self, st: &State) -> Outcome {
        if !self.options.play_sound {
            return Outcome::Skipped(Skip::SoundOff);
        }
        let Some(audio) = &st.audio else {
            return Outcome::Skipped(Skip::NoAudio);
        };
        if self.host.document.has_focus() && self.focus.is_focused() {
            return Outcome::Skipped(Skip::UserEngaged);
        }
        audio.play();
        info!("notification sound played");
        Outcome::Played
    }

    /// Release audio, unbind focus and cancel both blinks.
    fn teardown(&self) {
        self.focus.unbind(self.host.binder.as_ref());
        let mut st = self.state.lock();
        st.audio = None;
        st.enabled = false;
        if let Some(title) = st.window_blink.stop() {
            self.host.document.set_title(&title);
            debug!("title blink cancelled; disabled");
        }
        if let Some(element) = st.widget_blink.stop() {
            self.host.classes.remove_class(&element, BLINK_CLASS);
            debug!(element = %element, "element blink cancelled; disabled");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Indicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.inner.state.lock();
        f.debug_struct("Indicators")
            .field("enabled", &st.enabled)
            .field("audio", &st.audio.is_some())
            .field("window_blinking", &st.window_blink.is_blinking())
            .field("widget_blinking", &st.widget_blink.is_blinking())
            .field("widget_focused", &self.inner.focus.is_focused())
            .finish()
    }
}
