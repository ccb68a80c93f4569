pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod query;
pub mod report;
pub mod transform;
