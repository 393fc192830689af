//! Streaming text relay to the generative endpoint.
//!
//! Channel-based pipeline: the UI sends [`ChatCommand`]s and drains
//! [`ChatEvent`]s once per frame. A worker thread owns the HTTP client and a
//! tokio runtime, consumes the endpoint's SSE stream, and forwards each text
//! fragment as it arrives.
//!
//! Failure is degraded to a visible message, not a fault: a request that
//! cannot reach the endpoint produces a single `Failed` event carrying a
//! human-readable notice, tagged so the caller never renders it as model
//! output. There is no retry, no timeout, and no cancellation; an in-flight
//! stream runs to completion or failure regardless of what the UI does.

use crate::relay::config::RelayConfig;
use crate::relay::protocol::{parse_sse_data, GenerateRequest};
use crate::{AquadeskError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use futures::StreamExt;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Notice shown in place of a reply when the endpoint is unreachable.
pub const CONNECT_FAILED_NOTICE: &str = "Error: Could not connect to the AI service.";

#[derive(Debug, Clone)]
pub enum ChatCommand {
    /// Stream a reply for the given prompt
    Generate { prompt: String, request_id: Uuid },

    /// Shutdown the pipeline
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A text fragment arrived; the caller appends it to its accumulator
    Fragment { text: String, request_id: Uuid },

    /// The stream closed normally; carries the full accumulated text
    Completed { full_text: String, request_id: Uuid },

    /// The request failed outright; carries the display notice
    Failed { notice: String, request_id: Uuid },

    /// Pipeline has shut down
    Shutdown,
}

/// Streaming text pipeline with channel-based communication.
pub struct TextRelay {
    config: RelayConfig,
    command_tx: Sender<ChatCommand>,
    command_rx: Receiver<ChatCommand>,
    event_tx: Sender<ChatEvent>,
    event_rx: Receiver<ChatEvent>,
}

impl TextRelay {
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

    pub fn command_sender(&self) -> Sender<ChatCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<ChatEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::Builder::new()
            .name("text-relay".into())
            .spawn(move || {
                info!("Text relay worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(ChatEvent::Shutdown);
                        return;
                    }
                };

                let client = reqwest::Client::new();

                loop {
                    match command_rx.recv() {
                        Ok(ChatCommand::Generate { prompt, request_id }) => {
                            debug!("Streaming reply for request {}", request_id);
                            let result = runtime.block_on(stream_generate(
                                &client,
                                &config,
                                &prompt,
                                request_id,
                                &event_tx,
                            ));

                            match result {
                                Ok(full_text) => {
                                    let _ = event_tx.send(ChatEvent::Completed {
                                        full_text,
                                        request_id,
                                    });
                                }
                                Err(e) => {
                                    warn!("Streaming request failed: {}", e);
                                    let _ = event_tx.send(ChatEvent::Failed {
                                        notice: CONNECT_FAILED_NOTICE.to_string(),
                                        request_id,
                                    });
                                }
                            }
                        }

                        Ok(ChatCommand::Shutdown) => {
                            info!("Text relay worker shutting down");
                            let _ = event_tx.send(ChatEvent::Shutdown);
                            break;
                        }

                        Err(e) => {
                            error!("Command channel error: {}", e);
                            break;
                        }
                    }
                }

                info!("Text relay worker stopped");
            })
            .map_err(|e| AquadeskError::ChannelError(format!("Failed to spawn worker: {}", e)))?;

        Ok(())
    }
}

/// Consume the endpoint's SSE stream, forwarding each fragment as an event.
/// Returns the accumulated full text once the stream closes.
async fn stream_generate(
    client: &reqwest::Client,
    config: &RelayConfig,
    prompt: &str,
    request_id: Uuid,
    event_tx: &Sender<ChatEvent>,
) -> Result<String> {
    let request = GenerateRequest::new(prompt, config);
    let response = client
        .post(config.stream_url())
        .header("accept", "text/event-stream")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AquadeskError::RequestError(format!(
            "endpoint returned {status}: {body}"
        )));
    }

    // Parse SSE by lines: consecutive `data:` lines accumulate until a blank
    // line terminates the event.
    let mut accumulated = String::new();
    let mut buffer = String::new();
    let mut data_acc: Option<String> = None;
    let mut stream = response.bytes_stream();

    while let Some(item) = stream.next().await {
        let bytes = item?;
        buffer.push_str(&String::from_utf8_lossy(&bytes));

        while let Some(pos) = buffer.find('\n') {
            let mut line = buffer[..pos].to_string();
            if line.ends_with('\r') {
                line.pop();
            }
            buffer = buffer[pos + 1..].to_string();

            if line.is_empty() {
                // End of event
                if let Some(data) = data_acc.take() {
                    if let Some(piece) = parse_sse_data(&data) {
                        accumulated.push_str(&piece);
                        let _ = event_tx.send(ChatEvent::Fragment {
                            text: piece,
                            request_id,
                        });
                    }
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("data:") {
                let payload = rest.trim_start();
                match &mut data_acc {
                    Some(acc) => acc.push_str(payload),
                    None => data_acc = Some(payload.to_string()),
                }
            }
        }
    }

    // A final event without a trailing blank line still counts.
    if let Some(data) = data_acc.take() {
        if let Some(piece) = parse_sse_data(&data) {
            accumulated.push_str(&piece);
            let _ = event_tx.send(ChatEvent::Fragment {
                text: piece,
                request_id,
            });
        }
    }

    Ok(accumulated)
}
