pub mod cli;
pub mod load_config;
pub mod progress;
pub mod session;
pub mod steam;

pub use cli::{run, Cli, Commands};
