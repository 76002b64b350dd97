//! Function hosting providers

pub mod base;
pub mod google;

pub use google::GoogleDeployer;
