use serde::Serialize;
use serde_json::Value;

/// One command in flight: a name, a JSON payload, and the actor on whose
/// behalf it runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Caller-assigned id, echoed in logs for correlation.
    pub id: String,
    /// Command name, e.g. `"stock.reserve"`.
    pub command: String,
    /// JSON-encoded input payload.
    pub payload: Vec<u8>,
    /// Acting identity, forwarded into the session as `x-actor-id`.
    pub actor_id: Option<String>,
}

impl Message {
    pub fn new(id: impl Into<String>, command: impl Into<String>, payload: Vec<u8>) -> Self {
        Message {
            id: id.into(),
            command: command.into(),
            payload,
            actor_id: None,
        }
    }

    /// JSON-encode a typed payload.
    pub fn encode<T: Serialize>(
        id: impl Into<String>,
        command: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Message::new(id, command, serde_json::to_vec(payload)?))
    }

    /// Attach the acting identity. Builder pattern — returns `self`.
    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Decode the payload into a JSON value.
    pub fn payload_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
