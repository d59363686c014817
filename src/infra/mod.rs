//! Infrastructure layer — production implementations of the application
//! ports.

pub mod apt;
pub mod command_runner;
pub mod config;
pub mod fetch;
pub mod fs;
pub mod network;
pub mod process;
pub mod swap;
