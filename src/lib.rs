pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod session;
