pub mod config;
pub mod protocol;
pub mod text;
pub mod voice;

pub use config::RelayConfig;
pub use text::{ChatCommand, ChatEvent, TextRelay};
pub use voice::{VoiceCommand, VoiceEvent, VoicePhase, VoiceRelay};
