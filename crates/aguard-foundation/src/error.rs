use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Invalid session state transition: {0}")]
    InvalidState(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    /// The capture device could not be acquired at all (missing device,
    /// permission denied, host rejected the stream). The session must not
    /// start and no partial state may be left behind.
    #[error("Capture unavailable: {reason}")]
    CaptureUnavailable { reason: String },

    #[error("Device not found: {name:?}")]
    DeviceNotFound { name: Option<String> },

    #[error("Format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Supported stream configs error: {0}")]
    SupportedStreamConfigs(#[from] cpal::SupportedStreamConfigsError),
}

/// Clip generation or handoff to the playback sink failed. Non-fatal: the
/// capture session keeps running.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Playback sink failed: {0}")]
    Sink(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_errors_convert_into_app_errors() {
        let err: AppError = AudioError::CaptureUnavailable {
            reason: "permission denied".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Audio(_)));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn playback_errors_convert_and_format() {
        let err: AppError = PlaybackError::Sink("device gone".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Playback error: Playback sink failed: device gone"
        );
    }

    #[test]
    fn device_not_found_names_the_device() {
        let err = AudioError::DeviceNotFound {
            name: Some("usb-mic".to_string()),
        };
        assert!(err.to_string().contains("usb-mic"));
    }
}
