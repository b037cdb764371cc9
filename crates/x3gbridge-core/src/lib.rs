//! # X3GBridge Core
//!
//! Core types for X3GBridge: the error taxonomy, the machine
//! configuration model, and the overrides-file loader shared by the
//! session layer.

pub mod config;
pub mod error;
pub mod machine;

pub use config::{apply_machine_config, load_machine_config};
pub use error::{ConfigError, EngineError, Error, Result, TransportError};
pub use machine::{Axis, Machine};
