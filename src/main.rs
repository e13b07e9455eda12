//! EyeSaver - a break reminder for your eyes
//!
//! Counts down a work interval (25 minutes by default). When it elapses
//! the terminal shows an "Eye Break" alert and a system notification asks
//! you to look away from the screen for a while.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::task::LocalSet;

use eyesaver::cli::{Cli, Commands, Display, OutputMode, RunArgs, Session};
use eyesaver::notification::{HostNotificationCenter, NotificationScheduler};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Host notification calls are !Send, so everything runs on one LocalSet
    let local = LocalSet::new();
    if let Err(e) = local.run_until(execute(cli)).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose { "eyesaver=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run(args).await?,
        Some(Commands::Completions { shell }) => generate_completions(shell),
        None => run(RunArgs::default()).await?,
    }

    Ok(())
}

/// Runs the interactive timer on stdin.
async fn run(args: RunArgs) -> Result<()> {
    let config = args.timer_config();
    config.validate().context("Invalid timer configuration")?;

    let center = HostNotificationCenter::new().context("Failed to set up notifications")?;
    let scheduler = NotificationScheduler::new(center.clone(), center);

    let output = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    tracing::info!(duration = config.duration_seconds, ?output, "Starting session");

    let mut session = Session::new(config, scheduler, output);
    session
        .run(BufReader::new(tokio::io::stdin()), args.start)
        .await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["eyesaver"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["eyesaver", "run", "--start"]);
        match cli.command {
            Some(Commands::Run(args)) => assert!(args.start),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["eyesaver", "--verbose", "run"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
