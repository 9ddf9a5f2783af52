pub mod cli;
pub mod config;
pub mod cryptography;
pub mod filesystem;
pub mod logging;
pub mod tui;
pub mod vault;
