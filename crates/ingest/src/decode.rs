use base64::Engine;
use siren_core::error::{Result, SirenError};
use siren_core::model::envelope::LogEnvelope;

pub fn decode_envelope(data: &str) -> Result<LogEnvelope> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| SirenError::Parse(format!("event data is not valid base64: {e}")))?;
    serde_json::from_slice(&raw)
        .map_err(|e| SirenError::Parse(format!("event data is not a log entry: {e}")))
}
