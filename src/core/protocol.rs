use serde::{Deserialize, Serialize};

use super::reactor::CognitiveState;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("envelope is not a JSON object with a string `type`")]
    MissingType,
    #[error("unknown envelope type `{0}`")]
    UnknownType(String),
    #[error("malformed `{kind}` envelope: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Optional payload riding on a `state` envelope.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StateData {
    #[serde(default)]
    pub speaking: Option<bool>,
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default)]
    pub particle_mode: Option<String>,
}

fn default_role() -> String {
    "assistant".to_string()
}

/// Envelopes sent by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    State {
        state: CognitiveState,
        #[serde(default)]
        data: StateData,
    },
    Message {
        content: String,
        #[serde(default = "default_role")]
        role: String,
    },
    AudioLevel {
        level: f32,
    },
    Error {
        message: String,
    },
    System {
        message: String,
    },
    ParticleMode {
        mode: String,
    },
    SystemInfo {
        #[serde(default)]
        data: serde_json::Value,
    },
}

const INBOUND_TYPES: [&str; 7] = [
    "state",
    "message",
    "audio_level",
    "error",
    "system",
    "particle_mode",
    "system_info",
];

/// Decode one text frame. Unknown types are reported separately from
/// malformed known ones so the caller can log them differently.
pub fn decode(text: &str) -> Result<Inbound, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(ProtocolError::MissingType)?
        .to_string();
    if !INBOUND_TYPES.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownType(kind));
    }
    serde_json::from_value(value).map_err(|source| ProtocolError::Malformed { kind, source })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartListening,
    StopListening,
    SystemInfo,
}

/// Envelopes sent to the backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Message { content: String },
    Command { action: Command },
    Particle { mode: String },
}

pub fn encode(msg: &Outbound) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Body returned by the transcription endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TranscribeResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranscribeResponse {
    pub fn parse(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The transcript, or why there is none. Blank transcripts count as none.
    pub fn into_text(self) -> Result<String, ProtocolError> {
        if self.success == Some(false) {
            return Err(ProtocolError::Transcription(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        match self.text.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err(ProtocolError::Transcription("empty transcript".to_string())),
        }
    }
}
