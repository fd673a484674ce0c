//! Session variables from the transport context.

use std::collections::HashMap;

/// String-keyed variables supplied by the transport with each command —
/// HTTP headers, message metadata, or whatever the embedder forwards.
///
/// The subsystem reads exactly one of them: `x-actor-id`, the identity
/// recorded on every ledger entry. Authentication itself is the embedding
/// application's concern.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

/// Session variable naming the acting user or system.
pub const ACTOR_ID: &str = "x-actor-id";

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Create a session for a known actor.
    pub fn for_actor(actor_id: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(ACTOR_ID, actor_id);
        session
    }

    /// The acting user or system, if the transport supplied one.
    pub fn actor_id(&self) -> Option<&str> {
        self.get(ACTOR_ID)
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// All session variables.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session() {
        let session = Session::new();
        assert_eq!(session.actor_id(), None);
        assert!(!session.has("anything"));
    }

    #[test]
    fn actor_session() {
        let session = Session::for_actor("clerk-1");
        assert_eq!(session.actor_id(), Some("clerk-1"));
        assert!(session.has(ACTOR_ID));
    }

    #[test]
    fn from_map_keeps_variables() {
        let mut vars = HashMap::new();
        vars.insert(ACTOR_ID.to_string(), "picker-9".to_string());
        vars.insert("x-request-id".to_string(), "req-1".to_string());
        let session = Session::from_map(vars);

        assert_eq!(session.actor_id(), Some("picker-9"));
        assert_eq!(session.get("x-request-id"), Some("req-1"));
    }
}
