//! Client core for the Rizzource law-student job board.
//!
//! A typed gateway to the backend, an injectable state store with per-
//! operation request lifecycles, job normalization and client-side
//! filtering, and an encrypted persisted session.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod jobs;
pub mod models;
pub mod session;
pub mod store;

pub use config::Config;
pub use errors::{CodecError, ErrorKind, GatewayError, StorageError};
pub use gateway::{Gateway, HttpGateway};
pub use session::SessionPersistence;
pub use store::{CommitPolicy, JobSource, Operation, Status, Store};
