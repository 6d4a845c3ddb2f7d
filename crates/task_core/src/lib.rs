//! task_core - Shared configuration and filesystem paths for the task
//! manager client crates.

pub mod config;
pub mod paths;

pub use config::Config;
