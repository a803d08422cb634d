use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(name = "swot-board")]
#[command(version, about = "Collaborative SWOT analysis API server")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the API against MongoDB (MONGO_URI or MONGO_USERNAME/MONGO_PASSWORD)
    Serve {
        /// Port to listen on [default: 8080]
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Serve the API against a local document store; no database needed
    ServeLocal {
        /// Directory holding swot.loro (created if missing)
        #[arg(long, value_name = "DIR", default_value = ".swot")]
        data_dir: PathBuf,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve { port: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_is_optional() {
        let cli = Cli::try_parse_from(["swot-board"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Commands::default(), Commands::Serve { .. }));
    }

    #[test]
    fn test_serve_local_args() {
        let cli = Cli::try_parse_from(["swot-board", "serve-local", "--data-dir", "/tmp/x", "--port", "9001"])
            .unwrap();
        match cli.command {
            Some(Commands::ServeLocal { data_dir, port }) => {
                assert_eq!(data_dir, PathBuf::from("/tmp/x"));
                assert_eq!(port, 9001);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
