use std::path::PathBuf;

use crate::score::{run_score, ScoreTarget};
use crate::server;
use clap::{Args, Parser, Subcommand};
use transparent_procure::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TransparentProcure",
    about = "Serve and inspect procurement transparency data from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a reputation score card computed from the data directory
    Score {
        #[command(subcommand)]
        target: ScoreTarget,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the JSON collections
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score { target } => run_score(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_county_parses_name() {
        let cli = Cli::try_parse_from([
            "transparent-procure-api",
            "score",
            "county",
            "--name",
            "Nakuru",
            "--data-dir",
            "fixtures",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score {
                target: ScoreTarget::County { name, data },
            }) => {
                assert_eq!(name, "Nakuru");
                assert_eq!(data.data_dir, Some(PathBuf::from("fixtures")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["transparent-procure-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
