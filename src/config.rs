use crate::defaults;
use crate::detect::detector::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub detector: DetectorSection,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub block_size: usize,
}

/// Detection tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorSection {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub rise_multiplier: f32,
    pub fall_multiplier: f32,
    pub hold_secs: f64,
    pub alpha: f32,
    pub warmup_secs: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            block_size: defaults::BLOCK_SIZE,
        }
    }
}

impl Default for DetectorSection {
    fn default() -> Self {
        Self {
            min_duration_secs: defaults::MIN_WHISTLE_SECS,
            max_duration_secs: defaults::MAX_WHISTLE_SECS,
            rise_multiplier: defaults::RISE_MULTIPLIER,
            fall_multiplier: defaults::FALL_MULTIPLIER,
            hold_secs: defaults::HOLD_SECS,
            alpha: defaults::FLOOR_ALPHA,
            warmup_secs: defaults::WARMUP_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - WHISTLED_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device) = std::env::var("WHISTLED_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/whistled/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("whistled")
            .join("config.toml")
    }

    /// Collapse the audio + detector sections into the core's config.
    ///
    /// Validation happens at `Detector::new`, not here, so a bad file and a
    /// bad CLI override fail through the same path.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            sample_rate: self.audio.sample_rate,
            block_size: self.audio.block_size,
            min_duration: self.detector.min_duration_secs,
            max_duration: self.detector.max_duration_secs,
            rise_multiplier: self.detector.rise_multiplier,
            fall_multiplier: self.detector.fall_multiplier,
            hold_seconds: self.detector.hold_secs,
            alpha: self.detector.alpha,
            warmup_seconds: self.detector.warmup_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    #[test]
    fn default_config_matches_constants() {
        let config = Config::default();

        assert_eq!(config.audio.device, None);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.block_size, 1024);

        assert_eq!(config.detector.min_duration_secs, 1.0);
        assert_eq!(config.detector.max_duration_secs, 15.0);
        assert_eq!(config.detector.rise_multiplier, 6.0);
        assert_eq!(config.detector.fall_multiplier, 3.0);
        assert_eq!(config.detector.hold_secs, 0.4);
        assert_eq!(config.detector.alpha, 0.02);
        assert_eq!(config.detector.warmup_secs, 1.0);
    }

    #[test]
    fn load_from_toml_file() {
        let toml_content = r#"
            [audio]
            device = "pipewire"
            sample_rate = 48000
            block_size = 2048

            [detector]
            min_duration_secs = 0.8
            max_duration_secs = 10.0
            rise_multiplier = 5.0
            fall_multiplier = 2.5
            hold_secs = 0.3
            alpha = 0.05
            warmup_secs = 2.0
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.audio.device, Some("pipewire".to_string()));
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.block_size, 2048);
        assert_eq!(config.detector.min_duration_secs, 0.8);
        assert_eq!(config.detector.rise_multiplier, 5.0);
        assert_eq!(config.detector.warmup_secs, 2.0);
    }

    #[test]
    fn load_partial_config_uses_defaults() {
        let toml_content = r#"
            [detector]
            rise_multiplier = 8.0
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.detector.rise_multiplier, 8.0);
        // Everything else should be defaults
        assert_eq!(config.detector.fall_multiplier, 3.0);
        assert_eq!(config.audio.sample_rate, 16000);
    }

    #[test]
    fn env_override_device() {
        let _lock = ENV_LOCK.lock().unwrap();
        remove_env("WHISTLED_AUDIO_DEVICE");

        set_env("WHISTLED_AUDIO_DEVICE", "hw:1,0");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.audio.device, Some("hw:1,0".to_string()));

        remove_env("WHISTLED_AUDIO_DEVICE");
    }

    #[test]
    fn env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        remove_env("WHISTLED_AUDIO_DEVICE");

        set_env("WHISTLED_AUDIO_DEVICE", "");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.audio.device, None);

        remove_env("WHISTLED_AUDIO_DEVICE");
    }

    #[test]
    fn invalid_toml_returns_error() {
        let invalid_toml = r#"
            [audio
            device = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_whistled_config_12345.toml");
        let config = Config::load_or_default(missing_path);
        assert_eq!(config, Config::default());
    }

    #[test]
    #[should_panic(expected = "Failed to load config")]
    fn load_or_default_panics_on_invalid_toml() {
        let invalid_toml = r#"
            [audio
            device = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        Config::load_or_default(temp_file.path());
    }

    #[test]
    fn default_path_is_xdg_compliant() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("whistled"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn detector_config_mirrors_sections() {
        let mut config = Config::default();
        config.audio.sample_rate = 8000;
        config.detector.hold_secs = 0.25;

        let detector = config.detector_config();
        assert_eq!(detector.sample_rate, 8000);
        assert_eq!(detector.hold_seconds, 0.25);
        assert!(detector.validate().is_ok());
    }

    #[test]
    fn default_detector_config_validates() {
        assert!(Config::default().detector_config().validate().is_ok());
    }
}
