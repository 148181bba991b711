use std::error::Error;
use std::fs::File;
use std::str::FromStr;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::LoggingSettings;

/// Send `log` records to a file; the terminal belongs to the TUI.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Box<dyn Error>> {
    let level = LevelFilter::from_str(&settings.level).unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off {
        return Ok(());
    }

    let path = settings.file_path();
    WriteLogger::init(level, Config::default(), File::create(&path)?)?;
    log::info!("logging to {}", path.display());
    Ok(())
}
