//! Core types and configuration for relay.
//!
//! This crate defines the local configuration file ([`RelayConfig`]), the
//! ordered set of deployment environments ([`EnvRegistry`]), and the naming
//! convention that maps a project onto one application per environment
//! ([`naming`]).

pub mod config;
pub mod error;
pub mod naming;
pub mod registry;

pub use config::{Environment, RelayConfig};
pub use error::{Error, Result};
pub use naming::{IdentityError, ProjectIdentity};
pub use registry::EnvRegistry;
