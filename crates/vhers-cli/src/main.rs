use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod format;
mod io;

use cli::{Cli, Command, PinCommand};
use error::CliError;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "VHERS_LOG";

fn init_logging(cli: &Cli) {
    let default = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Pin {
            command: PinCommand::Batch { quantity, shape },
        } => cmd::pin::run_batch(*quantity, shape, cli.format),
        Command::Pin {
            command:
                PinCommand::Single {
                    existing,
                    claim,
                    shape,
                },
        } => {
            cmd::pin::run_single(
                existing.as_ref(),
                *claim,
                shape,
                cli.max_file_size,
                cli.format,
            )
            .await
        }
        Command::Score {
            request,
            record,
            threshold,
        } => cmd::score::run(&cmd::score::ScoreArgs {
            request,
            record,
            threshold: *threshold,
            weights: cli.weights.as_ref(),
            max_file_size: cli.max_file_size,
            format: cli.format,
        }),
        Command::Weights { file } => cmd::weights::run(
            file.as_ref().or(cli.weights.as_ref()),
            cli.max_file_size,
            cli.format,
        ),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli).await {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}
