//! Scripts for deploying a contract with per-network constructor arguments
//! and recording where it landed.

pub mod address;
pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod types;
