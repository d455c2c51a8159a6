// Infrastructure: configuration, logging and the gRPC server

pub mod config;

#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod server;

pub use config::{AppConfig, ConfigError};

#[cfg(feature = "server")]
pub use server::{start_server, ServerConfig};
