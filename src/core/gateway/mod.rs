//! CDN gateways placed in front of deployed functions

pub mod fastly;

pub use fastly::FastlyGateway;
