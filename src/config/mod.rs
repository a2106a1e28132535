use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::constants::*;
use crate::monitor::{SamplerConfig, SensorSource};
use crate::ui::{DisplayOptions, Layout};
use crate::units::TempUnit;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/sysmon/config.toml
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sampling interval in seconds
    pub update_interval_secs: f64,
    /// Show temperatures in Celsius (Fahrenheit otherwise)
    pub use_celsius: bool,
    /// Output layout
    pub layout: Layout,
    pub show_cpu: bool,
    pub show_ram: bool,
    pub show_gpu: bool,
    pub show_net: bool,
    pub show_disk: bool,
    /// Prefix values with "CPU:", "RAM:" etc.
    pub show_labels: bool,
    /// Probe for an NVIDIA GPU at startup
    pub gpu_enabled: bool,
    /// NVML device index
    pub gpu_index: u32,
    /// CPU temperature sensor settings
    pub sensors: SensorConfig,
}

/// CPU temperature source settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorConfig {
    pub source: SensorSource,
    /// LibreHardwareMonitor HTTP JSON endpoint URL.
    pub lhm_url: String,
    /// LibreHardwareMonitor request timeout in milliseconds.
    pub lhm_timeout_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: SensorSource::Auto,
            lhm_url: DEFAULT_LHM_URL.to_string(),
            lhm_timeout_ms: DEFAULT_LHM_TIMEOUT_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            // Fahrenheit by default, as PowerBar Pro shipped
            use_celsius: false,
            layout: Layout::Bar,
            show_cpu: true,
            show_ram: true,
            show_gpu: true,
            show_net: true,
            show_disk: true,
            show_labels: true,
            gpu_enabled: true,
            gpu_index: DEFAULT_GPU_INDEX,
            sensors: SensorConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    update_interval: Option<f64>,
    use_celsius: Option<bool>,
    layout: Option<Layout>,
    show_cpu: Option<bool>,
    show_ram: Option<bool>,
    show_gpu: Option<bool>,
    show_net: Option<bool>,
    show_disk: Option<bool>,
    show_labels: Option<bool>,
    gpu_enabled: Option<bool>,
    gpu_index: Option<u32>,
    sensors: Option<FileSensorConfig>,
}

/// TOML-deserializable sensor config section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileSensorConfig {
    source: Option<SensorSource>,
    lhm_url: Option<String>,
    lhm_timeout_ms: Option<u64>,
}

/// Keep an interval inside the supported range.
pub fn clamp_interval(secs: f64) -> f64 {
    if secs.is_nan() {
        return DEFAULT_UPDATE_INTERVAL_SECS;
    }
    secs.clamp(MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS)
}

impl Config {
    /// Load config from ~/.config/sysmon/config.toml, falling back to defaults
    /// for any missing fields. If the file doesn't exist, returns pure defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path with the same fallback rules.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("No config at {}: {}", path.display(), e);
                return Config::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!(
                    "Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    /// Parse config file content and merge it over the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file_config: FileConfig = toml::from_str(content)?;
        let mut config = Config::default();

        // Merge file values over defaults
        if let Some(v) = file_config.update_interval {
            config.update_interval_secs = clamp_interval(v);
        }
        if let Some(v) = file_config.use_celsius {
            config.use_celsius = v;
        }
        if let Some(v) = file_config.layout {
            config.layout = v;
        }
        if let Some(v) = file_config.show_cpu {
            config.show_cpu = v;
        }
        if let Some(v) = file_config.show_ram {
            config.show_ram = v;
        }
        if let Some(v) = file_config.show_gpu {
            config.show_gpu = v;
        }
        if let Some(v) = file_config.show_net {
            config.show_net = v;
        }
        if let Some(v) = file_config.show_disk {
            config.show_disk = v;
        }
        if let Some(v) = file_config.show_labels {
            config.show_labels = v;
        }
        if let Some(v) = file_config.gpu_enabled {
            config.gpu_enabled = v;
        }
        if let Some(v) = file_config.gpu_index {
            config.gpu_index = v;
        }

        // Merge sensor config
        if let Some(s) = file_config.sensors {
            if let Some(v) = s.source {
                config.sensors.source = v;
            }
            if let Some(v) = s.lhm_url {
                if !v.is_empty() {
                    config.sensors.lhm_url = v;
                }
            }
            if let Some(v) = s.lhm_timeout_ms {
                config.sensors.lhm_timeout_ms = v.max(50);
            }
        }

        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(clamp_interval(self.update_interval_secs))
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            gpu_enabled: self.gpu_enabled,
            gpu_index: self.gpu_index,
            sensor: self.sensors.source,
            lhm_url: self.sensors.lhm_url.clone(),
            lhm_timeout: Duration::from_millis(self.sensors.lhm_timeout_ms),
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            unit: TempUnit::from_celsius_flag(self.use_celsius),
            show_cpu: self.show_cpu,
            show_ram: self.show_ram,
            show_gpu: self.show_gpu,
            show_net: self.show_net,
            show_disk: self.show_disk,
            show_labels: self.show_labels,
            gpu_name: None,
            temperature_sensor: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            update_interval = 2.5
            use_celsius = true
            layout = "tray"
            show_disk = false
            gpu_index = 1

            [sensors]
            source = "lhm"
            lhm_url = "http://192.168.1.5:8085/data.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.update_interval_secs, 2.5);
        assert!(config.use_celsius);
        assert_eq!(config.layout, Layout::Tray);
        assert!(!config.show_disk);
        assert!(config.show_net);
        assert_eq!(config.gpu_index, 1);
        assert_eq!(config.sensors.source, SensorSource::Lhm);
        assert_eq!(config.sensors.lhm_url, "http://192.168.1.5:8085/data.json");
        assert_eq!(config.sensors.lhm_timeout_ms, DEFAULT_LHM_TIMEOUT_MS);
    }

    #[test]
    fn interval_is_clamped() {
        let fast = Config::from_toml_str("update_interval = 0.05").unwrap();
        assert_eq!(fast.update_interval_secs, MIN_UPDATE_INTERVAL_SECS);
        assert_eq!(fast.interval(), Duration::from_millis(500));

        let slow = Config::from_toml_str("update_interval = 3600.0").unwrap();
        assert_eq!(slow.update_interval_secs, MAX_UPDATE_INTERVAL_SECS);

        assert_eq!(clamp_interval(f64::NAN), DEFAULT_UPDATE_INTERVAL_SECS);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "update_interval = [not valid").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load_from(&dir.path().join("absent.toml")),
            Config::default()
        );
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "layout = \"panel\"\nshow_labels = false\n").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.layout, Layout::Panel);
        assert!(!config.display_options().show_labels);
    }

    #[test]
    fn derived_settings() {
        let config = Config {
            use_celsius: true,
            gpu_enabled: false,
            ..Config::default()
        };
        assert_eq!(config.display_options().unit, TempUnit::Celsius);
        let sampler = config.sampler_config();
        assert!(!sampler.gpu_enabled);
        assert_eq!(sampler.lhm_timeout, Duration::from_millis(DEFAULT_LHM_TIMEOUT_MS));
    }
}
