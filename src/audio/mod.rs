#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod pcm;
pub mod playback;
pub mod queue;
pub mod resampler;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use playback::PlaybackSchedule;
pub use queue::PlaybackQueue;
pub use resampler::AudioResampler;

/// Wire sample rate for audio sent to the voice endpoint.
pub const UPLINK_SAMPLE_RATE: u32 = 16_000;

/// Wire sample rate for audio received from the voice endpoint.
pub const DOWNLINK_SAMPLE_RATE: u32 = 24_000;
