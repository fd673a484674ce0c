//! Context passed to command handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// Everything a command handler needs: the parsed input, the session, and
/// the shared dependencies `D` the service was built with.
pub struct Context<'a, D> {
    command_name: String,
    input: Value,
    session: Session,
    deps: &'a D,
}

impl<'a, D> Context<'a, D> {
    pub(crate) fn new(command_name: String, input: Value, session: Session, deps: &'a D) -> Self {
        Self {
            command_name,
            input,
            session,
            deps,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// The raw JSON input.
    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    /// The command name being handled.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// The session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The acting identity, required. Ledger-writing commands call this so
    /// every movement carries a real actor.
    pub fn actor_id(&self) -> Result<&str, HandlerError> {
        self.session
            .actor_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing actor id in session".into()))
    }

    /// The shared dependencies.
    pub fn deps(&self) -> &D {
        self.deps
    }
}
