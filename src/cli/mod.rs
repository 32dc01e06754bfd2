//! Command-line interface for priorscan

pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, ExtractArgs, OutputFormatArg};
pub use handlers::handle_extract;
