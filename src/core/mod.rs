//! Core deployment logic
//!
//! Deployers push a function to a provider; gateways route traffic to the
//! deployed functions.

pub mod gateway;
pub mod providers;
pub mod traits;
