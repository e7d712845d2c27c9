//! Remote platform access for relay.
//!
//! - [`AppGateway`]: typed application, cname, env var and deploy operations
//!   over any [`Transport`]
//! - [`HttpTransport`]: the real HTTP transport (`reqwest`)
//! - [`TsuruDelegate`]: hands deploys, logs and app info over to the
//!   platform's own CLI through a [`TsuruExecutor`]
//! - `fake::FakePlatform` (feature `fake`): an in-memory platform for tests

pub mod delegate;
pub mod error;
pub mod executor;
#[cfg(feature = "fake")]
pub mod fake;
pub mod gateway;
pub mod models;
pub mod transport;

pub use delegate::{LogOptions, TsuruDelegate};
pub use error::{ExecError, GatewayError, TransportError};
pub use executor::{RealExecutor, TsuruExecutor};
pub use gateway::AppGateway;
pub use models::{App, AppOptions, Deploy, EnvVar, EnvVarDecl, EnvVarsUpdate, Plan};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, download};
