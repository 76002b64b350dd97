//! Fastly CDN gateway
//!
//! Publishes one backend per deployed function behind a single Fastly
//! service, with health checks and VCL that spreads requests across the
//! healthy backends.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;
pub mod vcl;

pub use client::{FastlyClient, FastlyTransaction};
pub use error::FastlyError;
pub use gateway::FastlyGateway;
pub use vcl::BackendTarget;
