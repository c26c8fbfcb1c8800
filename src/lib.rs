//! # Secret Manager FFI
//!
//! A C-callable client for GCP Secret Manager.
//!
//! Host languages that cannot link the native Google client (and have no
//! exception model) call the `smc_*` functions exported from [`ffi`]. Every
//! call returns a fixed-shape result envelope; nothing unwinds across the
//! boundary and every returned buffer is owned by the caller until it is
//! passed to `smc_free`.
//!
//! Rust callers can use [`client::SecretClient`] directly.
//!
//! ## Layout
//!
//! - [`resource_name`]: `projects/{p}/secrets/{s}/versions/{v}` names
//! - [`metadata`]: version metadata and its JSON rendering
//! - [`provider`]: the remote secret service trait and the REST backend
//! - [`client`]: synchronous client over one service
//! - [`ffi`]: the C ABI, result envelopes and buffer ownership
//! - [`observability`]: tracing setup and Prometheus metrics

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod ffi;
pub mod metadata;
pub mod observability;
pub mod provider;
pub mod resource_name;

pub use client::SecretClient;
pub use error::{ClientError, Status};
pub use resource_name::ResourceName;
