mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{handle_serve, handle_serve_local, init_logging, serve};
