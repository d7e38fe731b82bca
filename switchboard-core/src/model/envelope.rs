use crate::model::correlation::CorrelationId;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed envelope: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Wire unit exchanged with a peer: a correlation id and an opaque payload.
///
/// Encoded as JSON text with the payload in standard base64, e.g.
/// `{"id":"5f0c...","payload":"eyJ0eXBlIjoib2ZmZXIi..."}`. Both fields are
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_id_as_none"
    )]
    pub id: Option<CorrelationId>,

    #[serde(default, skip_serializing_if = "Bytes::is_empty", with = "base64_payload")]
    pub payload: Bytes,
}

impl Envelope {
    pub fn new(id: CorrelationId, payload: Bytes) -> Self {
        Self {
            id: Some(id),
            payload,
        }
    }

    pub fn encode(&self) -> Result<Bytes, EnvelopeError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(EnvelopeError::Encode)
    }

    pub fn decode(frame: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(frame).map_err(EnvelopeError::Decode)
    }
}

/// Peers send `""` for "no id"; it is treated like a missing id.
fn empty_id_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CorrelationId>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| CorrelationId::try_from(id).ok()))
}

mod base64_payload {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(payload: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(payload))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        // `null` is what peers send for an absent payload.
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Bytes::new());
        };
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
