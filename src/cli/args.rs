//! CLI argument definitions using clap
//!
//! Commands:
//! - regression-reactor formula
//! - regression-reactor predict --param1 <x1> --param2 <x2>
//! - regression-reactor explain
//! - regression-reactor shell

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Regression Reactor - predict outcomes with a simple linear regression model
#[derive(Parser, Debug)]
#[command(name = "regression-reactor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the model formula
    Formula,

    /// Compute one prediction and exit
    Predict {
        /// Parameter 1 (x1)
        #[arg(long, allow_hyphen_values = true)]
        param1: String,

        /// Parameter 2 (x2)
        #[arg(long, allow_hyphen_values = true)]
        param2: String,
    },

    /// Fetch the explanation of the formula and exit
    Explain,

    /// Interactive session reading intents from stdin
    Shell,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict_keeps_raw_text() {
        let cli = Cli::try_parse_from([
            "regression-reactor",
            "predict",
            "--param1",
            "-1",
            "--param2",
            "abc",
        ])
        .unwrap();

        match cli.command {
            Command::Predict { param1, param2 } => {
                assert_eq!(param1, "-1");
                assert_eq!(param2, "abc");
            }
            other => panic!("expected Predict, got {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["regression-reactor", "shell", "--config", "r.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("r.json")));
        assert!(matches!(cli.command, Command::Shell));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["regression-reactor"]).is_err());
    }
}
