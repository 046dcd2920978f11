use std::result::Result as StdResult;

use thiserror::Error;

/// Fixed component name that prefixes every error message.
pub const COMPONENT: &str = "Widget Indicators";

/// Convenient result type for the indicators crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised while building an [`Indicators`](crate::Indicators) controller.
///
/// The rendered messages are part of the public contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A configuration key outside the recognized set, or a non-object configuration.
    #[error("{}: Invalid argument passed", COMPONENT)]
    InvalidArgument,

    /// `widgetElement` does not name a real element.
    #[error("{}: Widget element option must be a HTML element", COMPONENT)]
    InvalidWidgetElement,

    /// `blinkElement` does not name a real element.
    #[error("{}: Blink element option must be a HTML element", COMPONENT)]
    InvalidBlinkElement,

    /// `windowBlink` is not a boolean.
    #[error("{}: Window blink option must be a boolean", COMPONENT)]
    InvalidWindowBlink,

    /// `playSound` is not a boolean.
    #[error("{}: Play sound option must be a boolean", COMPONENT)]
    InvalidPlaySound,

    /// `soundUrls` is not an object with string `mp3`/`ogg` entries.
    #[error("{}: Sound URLs option just be an object with 'mp3' and 'ogg' keys", COMPONENT)]
    InvalidSoundUrls,

    /// `enabled` is not a boolean.
    #[error("{}: Enabled option must be a boolean", COMPONENT)]
    InvalidEnabled,

    /// A widget element was given without a blink element.
    #[error("{}: Must pass a blink element option when passing a widget element option", COMPONENT)]
    MissingBlinkElement,

    /// A blink element was given without a widget element.
    #[error("{}: Must pass a widget element option when passing a blink element option", COMPONENT)]
    MissingWidgetElement,

    /// Title blink requested with empty text. Reported as a signal, never returned from
    /// construction.
    #[error("{}: Window blink requires non-empty blink text", COMPONENT)]
    MissingBlinkText,

    /// `Indicators::new` was called outside of a Tokio runtime.
    #[error("{}: Must be created inside a Tokio runtime", COMPONENT)]
    NoRuntime,
}

/// Failure reported by an [`AudioBackend`](crate::AudioBackend).
///
/// These never escape the controller: a failed audio resource only turns sound off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The platform has no audio primitive.
    #[error("audio playback is not supported")]
    Unsupported,

    /// The audio primitive exists but could not be constructed.
    #[error("failed to create audio resource: {0}")]
    Create(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_component_prefix() {
        assert_eq!(
            Error::InvalidArgument.to_string(),
            "Widget Indicators: Invalid argument passed"
        );
        assert_eq!(
            Error::InvalidSoundUrls.to_string(),
            "Widget Indicators: Sound URLs option just be an object with 'mp3' and 'ogg' keys"
        );
        assert_eq!(
            Error::MissingWidgetElement.to_string(),
            "Widget Indicators: Must pass a widget element option when passing a blink element option"
        );
    }
}
