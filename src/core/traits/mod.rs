//! Core traits module

pub mod deployer;

pub use deployer::Deployer;
