use crate::config::Settings;

/// Settings to run with, plus the reason defaults were used instead, if any.
///
/// Config is optional: a broken file or out-of-range value never stops the
/// app from starting.
pub fn load_settings() -> (Settings, Option<String>) {
    settle(Settings::load())
}

fn settle(loaded: Result<Settings, ::config::ConfigError>) -> (Settings, Option<String>) {
    let problem = match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => return (s, None),
            Err(msg) => format!("invalid config, using defaults: {msg}"),
        },
        Err(e) => format!("failed to load config, using defaults: {e}"),
    };
    // The file logger is not up yet; it gets the same line later.
    eprintln!("playdeck: {problem}");
    (Settings::default(), Some(problem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings_pass_through() {
        let mut s = Settings::default();
        s.controls.scrub_seconds = 12;
        let (settled, problem) = settle(Ok(s));
        assert_eq!(settled.controls.scrub_seconds, 12);
        assert!(problem.is_none());
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults_with_a_reason() {
        let mut s = Settings::default();
        s.audio.tick_interval_ms = 0;
        let (settled, problem) = settle(Ok(s));
        assert_eq!(settled.audio.tick_interval_ms, 250);
        assert!(problem.unwrap().contains("tick_interval_ms"));
    }

    #[test]
    fn load_errors_fall_back_to_defaults_with_a_reason() {
        let err = ::config::ConfigError::Message("bad toml".to_string());
        let (settled, problem) = settle(Err(err));
        assert_eq!(settled.controls.scrub_seconds, 5);
        assert!(problem.unwrap().contains("bad toml"));
    }
}
