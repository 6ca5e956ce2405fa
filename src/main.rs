//! masonjar's main application entry point.
//! Parses the command line, resolves settings and dispatches commands.

use std::path::PathBuf;

use masonjar::{
    cli::{get_args, Cli, Commands},
    commands,
    config::{default_home_dir, Settings},
    error::{default_error_handler, Result},
    logger::init_logger,
};

fn main() {
    let cli = get_args();

    if let Err(err) = run(cli) {
        default_error_handler(err);
    }
}

/// Resolves settings, configures logging and runs the requested command.
///
/// Precedence for every setting: command-line flag, then `MASONJAR_*`
/// environment variable, then settings file, then built-in default.
fn run(cli: Cli) -> Result<()> {
    // an explicit settings file defines the home on its own
    let home_dir = match cli.config {
        Some(_) => PathBuf::new(),
        None => default_home_dir()?,
    };
    let settings = Settings::load(cli.config.as_deref(), &home_dir)?
        .merge_env(|key| std::env::var(key).ok());

    let log_file = cli.logfile.clone().unwrap_or_else(|| settings.log_path());
    init_logger(cli.verbose, &log_file)?;

    match cli.command {
        Commands::Open(args) => {
            let destination = commands::open(settings.repo_dir(), &args)?;
            println!("Opened jar '{}' in {}.", args.jar, destination.display());
        }
        Commands::List => {
            for jar in commands::list(settings.repo_dir())? {
                println!("{}", jar.name());
            }
        }
        Commands::Update(args) => {
            let outcome = commands::update(&settings, &args)?;
            println!("Jar repository {} ({}).", outcome, settings.repo_dir().display());
        }
    }

    Ok(())
}
