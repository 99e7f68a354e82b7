//! Request lifecycle for the privacy-preserving quota status endpoint.
//!
//! An inbound call moves through a fixed sequence of gates before any
//! downstream quota logic runs:
//! validate → authenticate → resolve key version → build session → handle →
//! respond.
//!
//! ## Layering
//!
//! - `access/` owns the request gates (validation and authentication).
//! - `ops/` provides mechanical, reusable side-effecting operations
//!   (key-version resolution, sending response bodies).
//! - `workflow/` composes the gates into the per-endpoint session factory
//!   and drives the external quota handler.
//! - `dto/` holds the wire shapes; `config/` the TOML-backed service model.
//!
//! The default flow is: workflow → access → ops → dto.

pub mod access;
pub mod config;
pub mod dto;
pub mod error;
pub mod ids;
pub mod log;
pub mod ops;
pub mod types;
pub mod workflow;

pub use error::Error;
pub(crate) use thiserror::Error as ThisError;

///
/// Crate Version
///

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
