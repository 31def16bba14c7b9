//! Startup configuration and command-line flags.

/// Companion window and pipeline options, resolved before the event loop
/// starts.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gpu_debug: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub vsync: bool,
    /// Blocking pipeline drain after present, a workaround for a driver
    /// stutter seen with some compositors.
    pub flush_workaround: bool,
    pub cube_volume: u32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 1280,
            height: 720,
            gpu_debug: false,
            verbose: false,
            quiet: false,
            vsync: true,
            flush_workaround: true,
            cube_volume: 20,
            near_clip: 0.1,
            far_clip: 30.0,
        }
    }
}

impl AppConfig {
    /// Parses the supported flags, ignoring anything unrecognised.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "--gpu-debug" => config.gpu_debug = true,
                "--verbose" | "-v" => config.verbose = true,
                "--quiet" => config.quiet = true,
                "--no-vsync" => config.vsync = false,
                "--no-flush-workaround" => config.flush_workaround = false,
                "--cube-volume" => {
                    if let Some(value) = args.next() {
                        match value.as_ref().parse() {
                            Ok(n) => config.cube_volume = n,
                            Err(_) => {
                                log::warn!("ignoring non-integer --cube-volume {}", value.as_ref())
                            }
                        }
                    }
                }
                other => log::warn!("ignoring unknown flag {other}"),
            }
        }
        config
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Warn
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let config = AppConfig::from_args(Vec::<String>::new());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::from_args(["--no-vsync", "--gpu-debug", "--cube-volume", "6"]);
        assert!(!config.vsync);
        assert!(config.gpu_debug);
        assert_eq!(config.cube_volume, 6);
    }

    #[test]
    fn quiet_beats_verbose_for_level() {
        let config = AppConfig::from_args(["--quiet", "--verbose"]);
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn bad_volume_value_is_ignored() {
        let config = AppConfig::from_args(["--cube-volume", "lots"]);
        assert_eq!(config.cube_volume, AppConfig::default().cube_volume);
    }
}
