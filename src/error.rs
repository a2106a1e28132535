//! Error types for sampling.

use std::fmt;

/// Device families the sampler probes at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Gpu,
    TemperatureSensor,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu => write!(f, "GPU"),
            Self::TemperatureSensor => write!(f, "temperature sensor"),
        }
    }
}

/// Independently optional metric groups of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricGroup {
    CpuTemperature,
    Gpu,
    Network,
    Disk,
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CpuTemperature => write!(f, "cpu temperature"),
            Self::Gpu => write!(f, "gpu"),
            Self::Network => write!(f, "network"),
            Self::Disk => write!(f, "disk"),
        }
    }
}

/// Errors that can occur while building or driving a sampler.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// An optional provider is absent; its group stays disabled for the
    /// sampler's lifetime.
    #[error("{device} unavailable: {reason}")]
    DeviceUnavailable { device: Device, reason: String },

    /// One tick's query to a provider failed; only that tick's group is absent.
    #[error("failed to read {group}: {reason}")]
    TransientReadFailure { group: MetricGroup, reason: String },

    /// The core OS metrics provider cannot be used at all.
    #[error("system metrics unavailable: {0}")]
    FatalInitFailure(String),
}

impl SamplerError {
    pub fn unavailable(device: Device, reason: impl fmt::Display) -> Self {
        Self::DeviceUnavailable {
            device,
            reason: reason.to_string(),
        }
    }

    pub fn transient(group: MetricGroup, reason: impl fmt::Display) -> Self {
        Self::TransientReadFailure {
            group,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = SamplerError> = std::result::Result<T, E>;
