//! Streaming voice relay: a bidirectional audio session with the
//! generative-voice endpoint.
//!
//! Phases: `Idle → Connecting → Listening ⇄ Speaking → Idle`, with any
//! failure collapsing back to `Idle`. While listening, captured microphone
//! frames are resampled to the 16 kHz wire rate, PCM-encoded, and sent
//! fire-and-forget. Inbound 24 kHz fragments are decoded and scheduled for
//! gapless playback; an interruption marker (barge-in) drops everything
//! pending and resets the playback clock. Input/output transcription
//! fragments surface as events for the transcript view.

use crate::messages::Role;
use crate::relay::config::RelayConfig;
use crate::{AquadeskError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePhase {
    /// No session
    Idle,
    /// Session opening; capture is live but frames are not yet forwarded
    Connecting,
    /// Forwarding captured audio upstream
    Listening,
    /// Inbound audio is playing; capture keeps forwarding for barge-in
    Speaking,
}

#[derive(Debug, Clone)]
pub enum VoiceCommand {
    /// Open the session and start relaying
    Start,

    /// Close the session and return to idle
    Stop,

    /// Shutdown the pipeline
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum VoiceEvent {
    PhaseChanged(VoicePhase),

    /// A transcription fragment for either direction
    Transcript { role: Role, text: String },

    /// The session failed; the relay has returned to idle
    Error(String),

    /// Pipeline has shut down
    Shutdown,
}

/// How a session ended, seen from the worker loop.
enum SessionEnd {
    /// Explicit stop from the UI
    Stopped,
    /// The endpoint closed the stream
    Closed,
    /// Whole pipeline shutdown was requested mid-session
    Shutdown,
}

/// Voice session pipeline with channel-based communication.
pub struct VoiceRelay {
    config: RelayConfig,
    command_tx: Sender<VoiceCommand>,
    command_rx: Receiver<VoiceCommand>,
    event_tx: Sender<VoiceEvent>,
    event_rx: Receiver<VoiceEvent>,
}

impl VoiceRelay {
    pub fn new(config: RelayConfig) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(256);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    pub fn command_sender(&self) -> Sender<VoiceCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<VoiceEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::Builder::new()
            .name("voice-relay".into())
            .spawn(move || {
                info!("Voice relay worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(VoiceEvent::Shutdown);
                        return;
                    }
                };

                loop {
                    match command_rx.recv() {
                        Ok(VoiceCommand::Start) => {
                            let _ = event_tx.send(VoiceEvent::PhaseChanged(VoicePhase::Connecting));

                            let outcome =
                                runtime.block_on(run_session(&config, &command_rx, &event_tx));

                            // Whatever happened, the relay is idle again and
                            // the audio resources are released.
                            let _ = event_tx.send(VoiceEvent::PhaseChanged(VoicePhase::Idle));

                            match outcome {
                                Ok(SessionEnd::Stopped) => debug!("Voice session stopped"),
                                Ok(SessionEnd::Closed) => debug!("Voice session closed by endpoint"),
                                Ok(SessionEnd::Shutdown) => {
                                    info!("Voice relay worker shutting down");
                                    let _ = event_tx.send(VoiceEvent::Shutdown);
                                    break;
                                }
                                Err(e) => {
                                    warn!("Voice session failed: {}", e);
                                    let _ = event_tx.send(VoiceEvent::Error(e.user_message()));
                                }
                            }
                        }

                        // Stale stop while already idle
                        Ok(VoiceCommand::Stop) => {}

                        Ok(VoiceCommand::Shutdown) => {
                            info!("Voice relay worker shutting down");
                            let _ = event_tx.send(VoiceEvent::Shutdown);
                            break;
                        }

                        Err(e) => {
                            error!("Command channel error: {}", e);
                            break;
                        }
                    }
                }

                info!("Voice relay worker stopped");
            })
            .map_err(|e| AquadeskError::ChannelError(format!("Failed to spawn worker: {}", e)))?;

        Ok(())
    }
}

#[cfg(feature = "audio-io")]
async fn run_session(
    config: &RelayConfig,
    command_rx: &Receiver<VoiceCommand>,
    event_tx: &Sender<VoiceEvent>,
) -> Result<SessionEnd> {
    use crate::audio::resampler::AudioResampler;
    use crate::audio::{
        pcm, AudioInput, AudioOutput, PlaybackQueue, PlaybackSchedule, DOWNLINK_SAMPLE_RATE,
        UPLINK_SAMPLE_RATE,
    };
    use crate::relay::protocol::{audio_frame, parse_session_message, setup_message, SessionEvent};
    use futures::{SinkExt, StreamExt};
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;

    // Microphone capture comes up first so frames are flowing by the time
    // the endpoint acknowledges setup.
    let mut input = AudioInput::new()?;
    let capture_rate = input.sample_rate();
    let (frame_tx, frame_rx) = bounded::<Vec<f32>>(64);
    input.start_capture(frame_tx)?;

    let mut output = AudioOutput::new()?;
    let playback_rate = output.sample_rate();
    // A minute of headroom; fragments beyond that are dropped, not wrapped.
    let queue = PlaybackQueue::new(playback_rate as usize * 60);
    output.start_playback(queue.clone())?;

    let (ws, _) = tokio_tungstenite::connect_async(config.live_url()).await?;
    let (mut sink, mut stream) = ws.split();
    sink.send(Message::Text(setup_message(config))).await?;

    // Bridge the capture callback's channel into the async loop.
    let (uplink_tx, mut uplink_rx) = tokio::sync::mpsc::unbounded_channel::<Vec<f32>>();
    std::thread::spawn(move || {
        while let Ok(frame) = frame_rx.recv() {
            if uplink_tx.send(frame).is_err() {
                break;
            }
        }
    });

    let mut uplink_resampler = if capture_rate != UPLINK_SAMPLE_RATE {
        Some(AudioResampler::new(capture_rate, UPLINK_SAMPLE_RATE)?)
    } else {
        None
    };
    let mut downlink_resampler = if DOWNLINK_SAMPLE_RATE != playback_rate {
        Some(AudioResampler::new(DOWNLINK_SAMPLE_RATE, playback_rate)?)
    } else {
        None
    };

    let mut schedule = PlaybackSchedule::new();
    let mut phase = VoicePhase::Connecting;
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            maybe_frame = uplink_rx.recv() => {
                match maybe_frame {
                    Some(frame) => {
                        // Frames captured before the session acknowledges
                        // setup are dropped.
                        if phase != VoicePhase::Connecting {
                            let wire = match &mut uplink_resampler {
                                Some(resampler) => resampler.resample(&frame)?,
                                None => frame,
                            };
                            let encoded = pcm::encode_frame(&wire);
                            sink.send(Message::Text(audio_frame(&encoded))).await?;
                        }
                    }
                    None => return Ok(SessionEnd::Closed),
                }
            }

            maybe_message = stream.next() => {
                let message = match maybe_message {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(SessionEnd::Closed),
                };

                let raw = match message {
                    Message::Text(text) => text,
                    Message::Binary(bytes) => String::from_utf8_lossy(&bytes).to_string(),
                    Message::Close(_) => return Ok(SessionEnd::Closed),
                    _ => continue,
                };

                let events = match parse_session_message(&raw) {
                    Ok(events) => events,
                    Err(e) => {
                        warn!("Skipping malformed session message: {}", e);
                        continue;
                    }
                };

                for event in events {
                    match event {
                        SessionEvent::SetupComplete => {
                            phase = VoicePhase::Listening;
                            let _ = event_tx.send(VoiceEvent::PhaseChanged(phase));
                        }
                        SessionEvent::Audio(data) => {
                            let samples = match pcm::decode_frame(&data) {
                                Ok(samples) => samples,
                                Err(e) => {
                                    warn!("Skipping undecodable audio fragment: {}", e);
                                    continue;
                                }
                            };
                            let playable = match &mut downlink_resampler {
                                Some(resampler) => resampler.resample(&samples)?,
                                None => samples,
                            };

                            let clock = queue.consumed_samples() as f64 / playback_rate as f64;
                            let duration = playable.len() as f64 / playback_rate as f64;
                            let start = schedule.schedule(clock, duration);
                            debug!("Scheduled {:.3}s fragment at {:.3}s", duration, start);
                            queue.push(&playable);

                            if phase == VoicePhase::Listening {
                                phase = VoicePhase::Speaking;
                                let _ = event_tx.send(VoiceEvent::PhaseChanged(phase));
                            }
                        }
                        SessionEvent::InputTranscript(text) => {
                            let _ = event_tx.send(VoiceEvent::Transcript {
                                role: Role::User,
                                text,
                            });
                        }
                        SessionEvent::OutputTranscript(text) => {
                            let _ = event_tx.send(VoiceEvent::Transcript {
                                role: Role::Assistant,
                                text,
                            });
                        }
                        SessionEvent::Interrupted => {
                            // Barge-in: halt pending playback, clock restarts.
                            queue.clear();
                            schedule.reset();
                            debug!("Playback interrupted by endpoint");
                        }
                        SessionEvent::TurnComplete => {
                            debug!("Endpoint marked turn complete");
                        }
                    }
                }
            }

            _ = tick.tick() => {
                // Drain UI commands that arrived mid-session.
                loop {
                    match command_rx.try_recv() {
                        Ok(VoiceCommand::Stop) => return Ok(SessionEnd::Stopped),
                        Ok(VoiceCommand::Shutdown) => return Ok(SessionEnd::Shutdown),
                        // A second start while running is a no-op
                        Ok(VoiceCommand::Start) => {}
                        Err(_) => break,
                    }
                }

                // All scheduled playback finished with nothing new queued.
                if phase == VoicePhase::Speaking && queue.is_empty() {
                    let clock = queue.consumed_samples() as f64 / playback_rate as f64;
                    if schedule.idle_at(clock) {
                        phase = VoicePhase::Listening;
                        let _ = event_tx.send(VoiceEvent::PhaseChanged(phase));
                    }
                }
            }
        }
    }
}

#[cfg(not(feature = "audio-io"))]
async fn run_session(
    _config: &RelayConfig,
    _command_rx: &Receiver<VoiceCommand>,
    _event_tx: &Sender<VoiceEvent>,
) -> Result<SessionEnd> {
    Err(AquadeskError::ConfigError(
        "audio I/O support is disabled in this build".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_creation() {
        let relay = VoiceRelay::new(RelayConfig::new("k"));
        let _command_tx = relay.command_sender();
        let _event_rx = relay.event_receiver();
    }

    #[test]
    fn test_phase_transitions_cover_error_path() {
        // Every non-idle phase collapses to Idle on failure; the worker
        // always emits PhaseChanged(Idle) after a session ends.
        for phase in [VoicePhase::Connecting, VoicePhase::Listening, VoicePhase::Speaking] {
            assert_ne!(phase, VoicePhase::Idle);
        }
    }

    #[test]
    fn test_transcript_event_roles() {
        let event = VoiceEvent::Transcript {
            role: Role::User,
            text: "raise the oxygen".into(),
        };
        match event {
            VoiceEvent::Transcript { role, .. } => assert_eq!(role, Role::User),
            _ => panic!("Wrong variant"),
        }
    }
}
