//! Application-wide constants.
//!
//! Centralizes sampling intervals, thresholds, unit factors and
//! configuration defaults.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Default sampling interval (seconds).
pub const DEFAULT_UPDATE_INTERVAL_SECS: f64 = 1.0;
/// Minimum sampling interval (seconds); shorter intervals make rates noisy.
pub const MIN_UPDATE_INTERVAL_SECS: f64 = 0.5;
/// Maximum sampling interval accepted from config or CLI (seconds).
pub const MAX_UPDATE_INTERVAL_SECS: f64 = 60.0;
/// Floor applied to elapsed time when deriving rates (seconds).
pub const MIN_RATE_ELAPSED_SECS: f64 = 0.1;

// ── Usage Bands ───────────────────────────────────────────────────
/// Value above which a reading is "critical" (exclusive).
pub const BAND_CRITICAL_PCT: f32 = 90.0;
/// Value above which a reading is "warning" (exclusive).
pub const BAND_WARNING_PCT: f32 = 75.0;

// ── Units ─────────────────────────────────────────────────────────
/// 1 KiB in bytes.
pub const ONE_KIB: f64 = 1024.0;
/// 1 MiB in bytes.
pub const ONE_MIB: f64 = 1024.0 * 1024.0;
/// 1 GiB in bytes.
pub const ONE_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
/// Text rendered in place of an unavailable reading.
pub const PLACEHOLDER: &str = "--";

// ── Devices ───────────────────────────────────────────────────────
/// Default NVML device index.
pub const DEFAULT_GPU_INDEX: u32 = 0;
/// Default LibreHardwareMonitor HTTP JSON URL.
pub const DEFAULT_LHM_URL: &str = "http://localhost:8085/data.json";
/// Default LibreHardwareMonitor request timeout (ms).
pub const DEFAULT_LHM_TIMEOUT_MS: u64 = 500;
/// Maximum hwmon temperature sensor index to probe.
pub const MAX_HWMON_SENSORS: u32 = 32;
/// Maximum thermal zone index to probe.
pub const MAX_THERMAL_ZONES: u32 = 10;
/// hwmon chip names that report CPU temperatures.
pub const CPU_HWMON_CHIPS: &[&str] = &[
    "coretemp",
    "k10temp",
    "zenpower",
    "cpu_thermal",
    "soc_thermal",
    "acpitz",
];
/// Disk sector size (bytes) for /proc/diskstats.
pub const SECTOR_SIZE_BYTES: u64 = 512;
/// Minimum fields expected in a /proc/diskstats line.
pub const MIN_DISKSTATS_FIELDS: usize = 14;
/// Block device name prefixes excluded from disk totals.
pub const VIRTUAL_BLOCK_PREFIXES: &[&str] = &["loop", "ram", "dm-", "zram", "md"];

// ── Prometheus Metrics ────────────────────────────────────────────
/// Prometheus metrics output buffer initial capacity.
pub const PROM_BUFFER_CAPACITY: usize = 2048;

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Returns `~/.config/sysmon/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("sysmon")
}

/// Returns `~/.config/sysmon/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
