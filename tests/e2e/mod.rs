//! End-to-end tests for deploykit
//!
//! These tests deploy for real and require credentials.
//! Run with: cargo test -- --ignored
//!
//! Required environment variables:
//! - DEPLOYKIT_E2E_CONFIG: deploy configuration file (archive, Google and Fastly settings)

pub mod deploy;
