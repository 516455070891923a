//! HTTP gateway exposing initialize and chat over axum.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::GatewayError;
pub use router::build_router;
pub use server::{AppState, GatewayServer};
