use std::path::PathBuf;

use log::{info, warn};

use crate::config;
use crate::library::{Library, LibraryError};
use crate::player::{AudioSink, Player};

/// Command line: `playdeck [--print-default-config] [PATH...]`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub print_default_config: bool,
    pub paths: Vec<PathBuf>,
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--print-default-config" => parsed.print_default_config = true,
            _ => parsed.paths.push(PathBuf::from(arg)),
        }
    }
    parsed
}

/// Load every path into a library; no paths means the working directory.
pub fn load_library(
    paths: &[PathBuf],
    settings: &config::Settings,
) -> Result<Library, LibraryError> {
    let paths = if paths.is_empty() {
        vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
    } else {
        paths.to_vec()
    };
    Library::from_paths(&paths, &settings.library)
}

/// Put the library into the queue without starting playback.
pub fn apply_queue<S: AudioSink>(player: &mut Player<S>, library: &Library) {
    player.set_queue(library.tracks().to_vec());
    let queued = player.queue_snapshot().len();
    if queued < library.len() {
        warn!("{} track(s) skipped: no playable locator", library.len() - queued);
    }
    info!("queue ready with {queued} track(s)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parse_args_collects_paths_in_order() {
        let parsed = args(&["a", "--print-default-config", "b.json"]);
        assert!(parsed.print_default_config);
        assert_eq!(parsed.paths, vec![PathBuf::from("a"), PathBuf::from("b.json")]);
    }

    #[test]
    fn parse_args_defaults_to_nothing() {
        assert_eq!(args(&[]), Args::default());
    }
}
