//! Command facade — named commands over the inventory managers.
//!
//! The subsystem does not own the outward RPC boundary; this module is the
//! seam the surrounding application plugs its transport into. Commands are
//! dispatched by name with a JSON input and a [`Session`] carrying
//! transport metadata (the actor id feeds movement auditing). Optional
//! transports: an axum HTTP layer (`http` feature) and a point-to-point
//! queue consumer (`bus` feature).

mod context;
mod error;
mod handlers;
#[cfg(feature = "http")]
mod http;
mod service;
mod session;
#[cfg(feature = "bus")]
mod thread;

pub use context::Context;
pub use error::HandlerError;
pub use handlers::{inventory_service, InventoryDeps};
#[cfg(feature = "http")]
pub use http::{router, serve};
pub use service::Service;
pub use session::Session;
#[cfg(feature = "bus")]
pub use thread::{ServiceStats, ServiceThread};
