//! Command definitions for the break timer CLI.
//!
//! Uses clap derive macro for argument parsing. Interactive commands typed
//! while the session runs are parsed by [`SessionCommand`].

use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::types::TimerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// EyeSaver - a countdown that reminds you to rest your eyes
#[derive(Parser, Debug)]
#[command(
    name = "eyesaver",
    version,
    about = "Break-reminder countdown with system notifications",
    long_about = "Counts down a work interval and, when it elapses, shows an \"Eye Break\" \
                  alert and a system notification telling you to rest your eyes.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive timer
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Countdown duration in minutes (1-120); stop always resets to it
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub minutes: u32,

    /// Start counting down immediately
    #[arg(short, long)]
    pub start: bool,

    /// Ignore +/- adjustments while the countdown runs
    #[arg(long)]
    pub lock_while_running: bool,

    /// Print timer events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: 25,
            start: false,
            lock_while_running: false,
            json: false,
        }
    }
}

impl RunArgs {
    /// Builds the timer configuration for these arguments.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::default()
            .with_minutes(self.minutes)
            .with_lock_while_running(self.lock_while_running)
    }
}

// ============================================================================
// Interactive Commands
// ============================================================================

/// Commands typed into a running session, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start/stop button
    Toggle,
    /// Add one minute
    Increase,
    /// Remove one minute
    Decrease,
    /// Bell button: ask for notification permission again
    RequestPermission,
    /// Print the current state
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "start" | "stop" => Ok(Self::Toggle),
            "+" | "up" => Ok(Self::Increase),
            "-" | "down" => Ok(Self::Decrease),
            "b" | "bell" => Ok(Self::RequestPermission),
            "?" | "status" => Ok(Self::Status),
            "h" | "help" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (type h for help)")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["eyesaver"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["eyesaver", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["eyesaver", "run"]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.minutes, 25);
                    assert!(!args.start);
                    assert!(!args.lock_while_running);
                    assert!(!args.json);
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_with_options() {
            let cli = Cli::parse_from([
                "eyesaver",
                "run",
                "--minutes",
                "20",
                "--start",
                "--lock-while-running",
                "--json",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.minutes, 20);
                    assert!(args.start);
                    assert!(args.lock_while_running);
                    assert!(args.json);
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_minutes_out_of_range() {
            assert!(Cli::try_parse_from(["eyesaver", "run", "-m", "0"]).is_err());
            assert!(Cli::try_parse_from(["eyesaver", "run", "-m", "121"]).is_err());
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["eyesaver", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_default_config_matches_timer_default() {
            assert_eq!(RunArgs::default().timer_config(), TimerConfig::default());
        }

        #[test]
        fn test_timer_config_from_args() {
            let args = RunArgs {
                minutes: 45,
                lock_while_running: true,
                ..RunArgs::default()
            };
            let config = args.timer_config();
            assert_eq!(config.duration_seconds, 2700);
            assert!(config.lock_while_running);
        }
    }

    mod session_command_tests {
        use super::*;

        #[test]
        fn test_parse_toggle() {
            for input in ["", "s", "start", "stop", "  S  "] {
                assert_eq!(input.parse(), Ok(SessionCommand::Toggle), "{input:?}");
            }
        }

        #[test]
        fn test_parse_adjust() {
            assert_eq!("+".parse(), Ok(SessionCommand::Increase));
            assert_eq!("-".parse(), Ok(SessionCommand::Decrease));
        }

        #[test]
        fn test_parse_other_commands() {
            assert_eq!("b".parse(), Ok(SessionCommand::RequestPermission));
            assert_eq!("?".parse(), Ok(SessionCommand::Status));
            assert_eq!("help".parse(), Ok(SessionCommand::Help));
            assert_eq!("quit".parse(), Ok(SessionCommand::Quit));
        }

        #[test]
        fn test_parse_unknown() {
            let err = "pause".parse::<SessionCommand>().unwrap_err();
            assert!(err.contains("pause"));
        }
    }
}
