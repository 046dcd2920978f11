//! Controller configuration: defaults, typed options and loose-value validation.
//!
//! Typed callers build an [`Options`] directly. Configuration that arrives as a
//! loose JSON object (from a host page or a file) goes through
//! [`Options::from_value`], which rejects unknown keys and mistyped values with
//! the exact messages of [`Error`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    host::{Document, ElementId},
};

/// Recognized configuration keys.
pub const VALID_OPTIONS: [&str; 6] = [
    "widgetElement",
    "blinkElement",
    "windowBlink",
    "playSound",
    "soundUrls",
    "enabled",
];

/// Default location of the mp3 sound asset.
pub const DEFAULT_MP3_URL: &str = "sounds/gi-widget-pop.mp3";
/// Default location of the ogg sound asset.
pub const DEFAULT_OGG_URL: &str = "sounds/gi-widget-pop.ogg";

/// Locations of the notification sound, one per container format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundUrls {
    /// mp3 source, attached with mime `audio/mpeg`.
    pub mp3: String,
    /// ogg source, attached with mime `audio/ogg`.
    pub ogg: String,
}

impl Default for SoundUrls {
    fn default() -> Self {
        Self {
            mp3: DEFAULT_MP3_URL.to_string(),
            ogg: DEFAULT_OGG_URL.to_string(),
        }
    }
}

/// Finalized controller configuration. Immutable once the controller is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Element whose focus suppresses the indicators.
    pub widget_element: Option<ElementId>,
    /// Element that receives the blink class.
    pub blink_element: Option<ElementId>,
    /// Blink the document title while the document is unfocused.
    pub window_blink: bool,
    /// Play a sound on trigger.
    pub play_sound: bool,
    /// Sound asset locations.
    pub sound_urls: SoundUrls,
    /// Enable the controller right after construction.
    pub enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            widget_element: None,
            blink_element: None,
            window_blink: true,
            play_sound: true,
            sound_urls: SoundUrls::default(),
            enabled: true,
        }
    }
}

impl Options {
    /// Watch `widget` for focus and blink `blink` while it is unfocused.
    pub fn with_elements(mut self, widget: ElementId, blink: ElementId) -> Self {
        self.widget_element = Some(widget);
        self.blink_element = Some(blink);
        self
    }

    /// Check that the widget and blink elements are given together.
    pub fn validate(self) -> Result<Self> {
        match (&self.widget_element, &self.blink_element) {
            (Some(_), None) => Err(Error::MissingBlinkElement),
            (None, Some(_)) => Err(Error::MissingWidgetElement),
            _ => Ok(self),
        }
    }

    /// Validate a loose configuration object and merge it over the defaults.
    ///
    /// Element options are selector strings resolved through `document`. A
    /// `null` value counts as absent, as does a `null` configuration.
    pub fn from_value(value: &Value, document: &dyn Document) -> Result<Self> {
        let empty = Map::new();
        let map = match value {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                warn!("options are not an object");
                return Err(Error::InvalidArgument);
            }
        };

        if let Some(key) = map.keys().find(|k| !VALID_OPTIONS.contains(&k.as_str())) {
            warn!(key = %key, "unknown option");
            return Err(Error::InvalidArgument);
        }

        let field = |key: &str| map.get(key).filter(|v| !v.is_null());

        let widget_element = field("widgetElement")
            .map(|v| element(v, document).ok_or(Error::InvalidWidgetElement))
            .transpose()?;
        let blink_element = field("blinkElement")
            .map(|v| element(v, document).ok_or(Error::InvalidBlinkElement))
            .transpose()?;
        let window_blink = field("windowBlink")
            .map(|v| v.as_bool().ok_or(Error::InvalidWindowBlink))
            .transpose()?;
        let play_sound = field("playSound")
            .map(|v| v.as_bool().ok_or(Error::InvalidPlaySound))
            .transpose()?;
        let sound_urls = field("soundUrls").map(sound_urls).transpose()?;
        let enabled = field("enabled")
            .map(|v| v.as_bool().ok_or(Error::InvalidEnabled))
            .transpose()?;

        let defaults = Self::default();
        let options = Self {
            widget_element,
            blink_element,
            window_blink: window_blink.unwrap_or(defaults.window_blink),
            play_sound: play_sound.unwrap_or(defaults.play_sound),
            sound_urls: sound_urls.unwrap_or(defaults.sound_urls),
            enabled: enabled.unwrap_or(defaults.enabled),
        }
        .validate()?;
        debug!(?options, "options validated");
        Ok(options)
    }
}

/// Resolve an element option. Only selector strings naming an existing element qualify.
fn element(value: &Value, document: &dyn Document) -> Option<ElementId> {
    value.as_str().and_then(|sel| document.element(sel))
}

/// Parse the `soundUrls` mapping; missing entries keep their defaults.
fn sound_urls(value: &Value) -> Result<SoundUrls> {
    let map = value.as_object().ok_or(Error::InvalidSoundUrls)?;
    let mut urls = SoundUrls::default();
    for (key, slot) in [("mp3", &mut urls.mp3), ("ogg", &mut urls.ogg)] {
        match map.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(url)) => *slot = url.clone(),
            Some(_) => return Err(Error::InvalidSoundUrls),
        }
    }
    Ok(urls)
}
