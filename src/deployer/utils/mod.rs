//! Helpers shared by the deployer.

pub mod fs;
