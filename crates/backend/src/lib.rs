#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod records;
pub mod repository;
mod wire;

pub use config::{BackendConfig, ConfigError};
pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use repository::TrainerBackend;
