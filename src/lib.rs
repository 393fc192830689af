pub mod audio;
pub mod inventory;
pub mod messages;
pub mod relay;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AquadeskError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for AquadeskError {
    fn from(e: reqwest::Error) -> Self {
        AquadeskError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for AquadeskError {
    fn from(e: serde_json::Error) -> Self {
        AquadeskError::DecodeError(e.to_string())
    }
}

impl From<base64::DecodeError> for AquadeskError {
    fn from(e: base64::DecodeError) -> Self {
        AquadeskError::DecodeError(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AquadeskError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        AquadeskError::SessionError(e.to_string())
    }
}

impl AquadeskError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            AquadeskError::AudioDeviceError(_) => false,
            AquadeskError::AudioProcessingError(_) => true,
            // Transport errors are transient; the user can retry
            AquadeskError::RequestError(_) => true,
            AquadeskError::SessionError(_) => true,
            AquadeskError::DecodeError(_) => true,
            AquadeskError::ConfigError(_) => false,
            AquadeskError::ChannelError(_) => false,
            AquadeskError::Validation(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            AquadeskError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            AquadeskError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            AquadeskError::RequestError(_) => {
                "Error: Could not connect to the AI service.".to_string()
            }
            AquadeskError::SessionError(_) => {
                "Voice session failed. Please try again.".to_string()
            }
            AquadeskError::DecodeError(_) => {
                "Received a malformed response from the AI service.".to_string()
            }
            AquadeskError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            AquadeskError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            AquadeskError::Validation(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AquadeskError>;
