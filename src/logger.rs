use crate::constants::verbosity;
use crate::error::Result;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}

/// Initializes logging, appending to `log_file` (its directory is created
/// when missing).
pub fn init_logger(verbose: u8, log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    env_logger::Builder::new()
        .filter_level(get_log_level_from_verbose(verbose))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("Configured logging to '{}'", log_file.display());
    Ok(())
}
