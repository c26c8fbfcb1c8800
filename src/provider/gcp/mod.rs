//! # GCP Secret Manager Client
//!
//! Client for reading from Google Cloud Secret Manager.
//!
//! This module provides functionality to:
//! - Retrieve secret version payloads (`versions/*:access`)
//! - Retrieve secret version metadata (`versions/*`)
//!
//! Talks to the REST API v1 directly; see [`rest`] for transport details.

mod operations;
pub mod responses;
pub mod rest;
pub mod rpc_code;

pub use rest::SecretManagerRest;
