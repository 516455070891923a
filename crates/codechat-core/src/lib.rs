//! Configuration and conversation logic shared by the codechat binary.

pub mod config;
pub mod prompt;
pub mod session;

pub use config::{Config, ConfigError};
pub use session::{ChatSession, SessionError};
