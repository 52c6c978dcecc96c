use crate::error::DecodeError;
use crate::model::peer::PeerId;
use crate::model::room::{RoomId, RosterEntry};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Point-to-point handshake payload (offer, answer or candidate).
///
/// `payload` is kept as the raw JSON fragment the sender wrote and is never parsed.
#[derive(Debug, Clone)]
pub struct Relay {
    pub to: PeerId,
    /// Stamped by the server right before forwarding.
    pub from: Option<PeerId>,
    pub payload: Option<Box<RawValue>>,
}

/// Protocol message, one variant per `type` tag.
///
/// Decoding never fails on the tag alone: anything outside the known set
/// becomes [`SignalMessage::Unknown`].
#[derive(Debug, Clone)]
pub enum SignalMessage {
    Id { id: PeerId },
    Join { room: RoomId },
    Leave,
    Mic { mic_on: Option<bool> },
    Offer(Relay),
    Answer(Relay),
    Candidate(Relay),
    UserList { users: Vec<RosterEntry> },
    Unknown(String),
}

/// Flat wire shape shared by every message type.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    room: Option<RoomId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<PeerId>,
    #[serde(
        default,
        deserialize_with = "raw_payload",
        skip_serializing_if = "Option::is_none"
    )]
    offer: Option<Box<RawValue>>,
    #[serde(
        default,
        deserialize_with = "raw_payload",
        skip_serializing_if = "Option::is_none"
    )]
    answer: Option<Box<RawValue>>,
    #[serde(
        default,
        deserialize_with = "raw_payload",
        skip_serializing_if = "Option::is_none"
    )]
    candidate: Option<Box<RawValue>>,
    #[serde(rename = "micOn", default, skip_serializing_if = "Option::is_none")]
    mic_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    users: Option<Vec<RosterEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<PeerId>,
}

/// A present field always yields `Some`, an explicit `null` included.
fn raw_payload<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Box<RawValue>>, D::Error> {
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl SignalMessage {
    /// Decode a single text frame.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Self::from_envelope(envelope)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The wire `type` tag of this message.
    pub fn kind(&self) -> &str {
        match self {
            SignalMessage::Id { .. } => "id",
            SignalMessage::Join { .. } => "join",
            SignalMessage::Leave => "leave",
            SignalMessage::Mic { .. } => "mic",
            SignalMessage::Offer(_) => "offer",
            SignalMessage::Answer(_) => "answer",
            SignalMessage::Candidate(_) => "candidate",
            SignalMessage::UserList { .. } => "user_list",
            SignalMessage::Unknown(kind) => kind.as_str(),
        }
    }

    fn from_envelope(mut env: Envelope) -> Result<Self, DecodeError> {
        let kind = std::mem::take(&mut env.kind);

        let msg = match kind.as_str() {
            "id" => SignalMessage::Id {
                id: env.id.ok_or(DecodeError::MissingField {
                    kind: "id",
                    field: "id",
                })?,
            },
            // An empty room name means "no room" and never names a room.
            "join" => SignalMessage::Join {
                room: env
                    .room
                    .filter(|room| !room.as_str().is_empty())
                    .ok_or(DecodeError::MissingField {
                        kind: "join",
                        field: "room",
                    })?,
            },
            "leave" => SignalMessage::Leave,
            "mic" => SignalMessage::Mic { mic_on: env.mic_on },
            "offer" => SignalMessage::Offer(Relay::decode("offer", env.to, env.offer)?),
            "answer" => SignalMessage::Answer(Relay::decode("answer", env.to, env.answer)?),
            "candidate" => {
                SignalMessage::Candidate(Relay::decode("candidate", env.to, env.candidate)?)
            }
            "user_list" => SignalMessage::UserList {
                users: env.users.unwrap_or_default(),
            },
            other => SignalMessage::Unknown(other.to_owned()),
        };

        Ok(msg)
    }

    fn to_envelope(&self) -> Envelope {
        let kind = self.kind().to_owned();

        match self {
            SignalMessage::Id { id } => Envelope {
                kind,
                id: Some(id.clone()),
                ..Default::default()
            },
            SignalMessage::Join { room } => Envelope {
                kind,
                room: Some(room.clone()),
                ..Default::default()
            },
            SignalMessage::Mic { mic_on } => Envelope {
                kind,
                mic_on: *mic_on,
                ..Default::default()
            },
            SignalMessage::Offer(relay) => Envelope {
                offer: relay.payload.clone(),
                ..relay.envelope(kind)
            },
            SignalMessage::Answer(relay) => Envelope {
                answer: relay.payload.clone(),
                ..relay.envelope(kind)
            },
            SignalMessage::Candidate(relay) => Envelope {
                candidate: relay.payload.clone(),
                ..relay.envelope(kind)
            },
            SignalMessage::UserList { users } => Envelope {
                kind,
                users: Some(users.clone()),
                ..Default::default()
            },
            SignalMessage::Leave | SignalMessage::Unknown(_) => Envelope {
                kind,
                ..Default::default()
            },
        }
    }
}

impl Relay {
    // Client-supplied `from` never makes it past decoding.
    fn decode(
        kind: &'static str,
        to: Option<PeerId>,
        payload: Option<Box<RawValue>>,
    ) -> Result<Self, DecodeError> {
        let to = to.ok_or(DecodeError::MissingField { kind, field: "to" })?;
        Ok(Self {
            to,
            from: None,
            payload,
        })
    }

    fn envelope(&self, kind: String) -> Envelope {
        Envelope {
            kind,
            to: Some(self.to.clone()),
            from: self.from.clone(),
            ..Default::default()
        }
    }
}

impl Serialize for SignalMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_envelope().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignalMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let envelope = Envelope::deserialize(deserializer)?;
        Self::from_envelope(envelope).map_err(de::Error::custom)
    }
}
