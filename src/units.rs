//! Unit conversion and value classification shared by every presentation
//! adapter. Temperatures stay in Celsius until they reach one of these
//! helpers.

use std::fmt;

use crate::constants::{
    BAND_CRITICAL_PCT, BAND_WARNING_PCT, ONE_GIB, ONE_KIB, ONE_MIB, PLACEHOLDER,
};

/// Convert Celsius to Fahrenheit.
pub fn to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Temperature display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TempUnit {
    pub fn from_celsius_flag(use_celsius: bool) -> Self {
        if use_celsius {
            Self::Celsius
        } else {
            Self::Fahrenheit
        }
    }

    pub fn convert(self, celsius: f32) -> f32 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => to_fahrenheit(celsius),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Format a Celsius reading in the requested unit, or the placeholder.
pub fn format_temp(celsius: Option<f32>, unit: TempUnit) -> String {
    match celsius {
        Some(c) => format!("{:.0}{}", unit.convert(c), unit.symbol()),
        None => PLACEHOLDER.to_string(),
    }
}

/// Severity band of a percentage reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    Normal,
    Warning,
    Critical,
}

impl Band {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a percentage: above 90 is critical, above 75 is warning.
/// Both thresholds are exclusive.
pub fn band(value: f32) -> Band {
    if value > BAND_CRITICAL_PCT {
        Band::Critical
    } else if value > BAND_WARNING_PCT {
        Band::Warning
    } else {
        Band::Normal
    }
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / ONE_GIB
}

pub fn bytes_to_mib(bytes: f64) -> f64 {
    bytes / ONE_MIB
}

pub fn bytes_to_kib(bytes: f64) -> f64 {
    bytes / ONE_KIB
}

/// Right-aligned rate in KiB/s, or the placeholder padded to the same width.
pub fn format_kib_rate(bytes_per_sec: Option<f64>, width: usize) -> String {
    match bytes_per_sec {
        Some(v) => format!("{:>width$.0}", bytes_to_kib(v), width = width),
        None => format!("{:>width$}", PLACEHOLDER, width = width),
    }
}

/// Right-aligned rate in MiB/s with one decimal, or the placeholder.
pub fn format_mib_rate(bytes_per_sec: Option<f64>, width: usize) -> String {
    match bytes_per_sec {
        Some(v) => format!("{:>width$.1}", bytes_to_mib(v), width = width),
        None => format!("{:>width$}", PLACEHOLDER, width = width),
    }
}
