//! Audio resource creation for the notification sound.

use tracing::{debug, warn};

use crate::{
    error::AudioError,
    host::{AudioBackend, AudioClip, AudioSource},
    options::SoundUrls,
};

/// Mime type attached to the mp3 source.
pub const MP3_MIME: &str = "audio/mpeg";
/// Mime type attached to the ogg source.
pub const OGG_MIME: &str = "audio/ogg";

/// Source entries for the configured sound, mp3 first.
pub fn sources(urls: &SoundUrls) -> [AudioSource; 2] {
    [
        AudioSource {
            mime: MP3_MIME,
            url: urls.mp3.clone(),
        },
        AudioSource {
            mime: OGG_MIME,
            url: urls.ogg.clone(),
        },
    ]
}

/// Build the audio resource, or `None` when the platform cannot provide one.
///
/// Failures are absorbed here: sound is simply unavailable for this instance.
pub fn create(backend: &dyn AudioBackend, urls: &SoundUrls) -> Option<Box<dyn AudioClip>> {
    if !backend.is_supported() {
        debug!("audio unsupported; sound disabled");
        return None;
    }
    match backend.create(&sources(urls)) {
        Ok(clip) => {
            debug!(mp3 = %urls.mp3, ogg = %urls.ogg, "audio resource created");
            Some(clip)
        }
        Err(AudioError::Unsupported) => {
            debug!("audio unsupported; sound disabled");
            None
        }
        Err(e) => {
            warn!(error = %e, "audio resource creation failed; sound disabled");
            None
        }
    }
}
