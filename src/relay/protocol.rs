//! Wire types for the generative endpoints.
//!
//! Two surfaces share these types: the SSE streaming route for text
//! generation, and the bidirectional WebSocket session for voice. Inbound
//! session messages are a tagged union; [`parse_session_message`] flattens
//! one JSON message into the [`SessionEvent`]s it carries.

use crate::relay::config::RelayConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

// -----------------
// Text generation (request)
// -----------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

impl GenerateRequest {
    pub fn new(prompt: &str, config: &RelayConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: Some(config.system_instruction.clone()),
                    inline_data: None,
                }],
            },
        }
    }
}

// -----------------
// Text generation (streamed response chunks)
// -----------------

#[derive(Deserialize, Debug)]
pub struct GenerateChunk {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Extract the text piece carried by one SSE `data:` payload, if any.
pub fn parse_sse_data(data: &str) -> Option<String> {
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return None;
    }

    let chunk: GenerateChunk = serde_json::from_str(trimmed).ok()?;
    let candidate = chunk.candidates?.into_iter().next()?;
    let content = candidate.content?;
    let piece: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if piece.is_empty() {
        None
    } else {
        Some(piece)
    }
}

// -----------------
// Voice session (client messages)
// -----------------

/// Session setup: audio-only responses, both transcription directions on,
/// the fixed voice, and the shared system instruction.
pub fn setup_message(config: &RelayConfig) -> String {
    json!({
        "setup": {
            "model": config.live_model,
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": config.voice }
                    }
                }
            },
            "systemInstruction": {
                "parts": [{ "text": config.system_instruction }]
            },
            "inputAudioTranscription": {},
            "outputAudioTranscription": {}
        }
    })
    .to_string()
}

/// One fire-and-forget uplink audio frame (base64 16 kHz 16-bit LE PCM).
pub fn audio_frame(encoded_pcm: &str) -> String {
    json!({
        "realtimeInput": {
            "audio": {
                "data": encoded_pcm,
                "mimeType": "audio/pcm;rate=16000"
            }
        }
    })
    .to_string()
}

// -----------------
// Voice session (server messages)
// -----------------

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    pub model_turn: Option<Content>,
    pub input_transcription: Option<Transcription>,
    pub output_transcription: Option<Transcription>,
    #[serde(default)]
    pub turn_complete: bool,
    #[serde(default)]
    pub interrupted: bool,
}

#[derive(Deserialize, Debug)]
pub struct Transcription {
    pub text: Option<String>,
}

/// Flattened inbound session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SetupComplete,
    /// Base64 16-bit PCM at 24 kHz.
    Audio(String),
    InputTranscript(String),
    OutputTranscript(String),
    TurnComplete,
    Interrupted,
}

/// Decode one inbound session message into the events it carries, in the
/// order the fields appear in the union.
pub fn parse_session_message(raw: &str) -> Result<Vec<SessionEvent>> {
    let message: ServerMessage = serde_json::from_str(raw)?;
    let mut events = Vec::new();

    if message.setup_complete.is_some() {
        events.push(SessionEvent::SetupComplete);
    }

    if let Some(content) = message.server_content {
        if content.interrupted {
            events.push(SessionEvent::Interrupted);
        }
        if let Some(turn) = content.model_turn {
            for part in turn.parts {
                if let Some(blob) = part.inline_data {
                    events.push(SessionEvent::Audio(blob.data));
                }
            }
        }
        if let Some(transcription) = content.input_transcription {
            if let Some(text) = transcription.text {
                if !text.is_empty() {
                    events.push(SessionEvent::InputTranscript(text));
                }
            }
        }
        if let Some(transcription) = content.output_transcription {
            if let Some(text) = transcription.text {
                if !text.is_empty() {
                    events.push(SessionEvent::OutputTranscript(text));
                }
            }
        }
        if content.turn_complete {
            events.push(SessionEvent::TurnComplete);
        }
    }

    Ok(events)
}
