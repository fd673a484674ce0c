//! Service — command registry and dispatch.

use std::collections::HashMap;

use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Handler<D> = Box<dyn Fn(&Context<D>) -> Result<Value, HandlerError> + Send + Sync>;

/// A service that routes named commands to handler closures.
///
/// Generic over `D`, the shared dependencies handlers receive through their
/// [`Context`]. Built with the builder pattern:
///
/// ```ignore
/// let service = Service::new(deps)
///     .command("stock.reserve", |ctx| { /* ... */ });
/// let result = service.dispatch("stock.reserve", input, session);
/// ```
pub struct Service<D> {
    deps: D,
    handlers: HashMap<String, Handler<D>>,
}

impl<D: Send + Sync + 'static> Service<D> {
    /// Create a new service with the given dependencies.
    pub fn new(deps: D) -> Self {
        Self {
            deps,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler. Builder pattern — returns `self`.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<D>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Dispatch a command by name.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command.to_string(), input, session, &self.deps);
        let result = handler(&ctx);

        match &result {
            Ok(_) => tracing::debug!(command, "command handled"),
            Err(e) => tracing::debug!(command, error = %e, "command failed"),
        }
        result
    }

    /// List registered command names.
    pub fn commands(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    /// The shared dependencies.
    pub fn deps(&self) -> &D {
        &self.deps
    }
}
