use clap::Parser;
use swot_board::cli::{handle_serve, handle_serve_local, init_logging, Cli, Commands};

fn main() {
    // Values from .env also feed clap's `env` fallbacks
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command.unwrap_or_default() {
        Commands::Serve { port } => handle_serve(port),
        Commands::ServeLocal { data_dir, port } => handle_serve_local(data_dir, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
