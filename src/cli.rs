//! Command-line interface implementation for masonjar.
//! Provides argument parsing and help text formatting using clap.

use crate::constants::exit_codes;
use clap::{
    builder::NonEmptyStringValueParser, error::ErrorKind, Args, CommandFactory, Parser,
    Subcommand,
};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Command-line arguments structure for masonjar.
#[derive(Parser, Debug)]
#[command(author, version, about = "masonjar: a tool for provisioning canned workflows", long_about = None)]
pub struct Cli {
    /// Settings file (default is $HOME/.config/masonjar/masonjar.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log file (default is $HOME/.config/masonjar/masonjar.log)
    #[arg(long, global = true, value_name = "FILE")]
    pub logfile: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new directory based on an existing jar
    ///
    /// The jar name must match one of the names printed by `masonjar list`;
    /// the identifier names the copy.
    Open(OpenArgs),
    /// List the jars available in the local repository
    List,
    /// Get the latest jar definitions
    Update(UpdateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// Name of the jar to be used as a source
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub jar: String,

    /// Identifier for the jar to be created
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub identifier: String,

    /// Path in local filesystem where the jar will be created
    #[arg(long, default_value = ".")]
    pub destination: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Git repository containing the jar definitions
    /// (default is https://github.com/asicsdigital/masonjars)
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Remote of the git repository containing the jar definitions (default is 'origin')
    #[arg(long)]
    pub remote: Option<String>,
}

/// Parses command line arguments and returns the Cli structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::MissingSubcommand
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}
