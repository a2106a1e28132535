use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info, trace, warn};
use serde::Deserialize;

use super::counters::CounterState;
use super::gpu::{GpuSource, NvmlGpu};
use super::sensors::{HwmonSensor, TemperatureSource};
use super::system::{SysinfoSource, SystemSource};
use crate::constants::*;
use crate::error::{Device, MetricGroup, Result, SamplerError};
use crate::models::SampleSnapshot;
use crate::thermal::LhmSensor;

/// Where the CPU package temperature comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    /// hwmon on Linux, LibreHardwareMonitor elsewhere
    #[default]
    Auto,
    Hwmon,
    Lhm,
    None,
}

/// Device selection for `Sampler::new`.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub gpu_enabled: bool,
    pub gpu_index: u32,
    pub sensor: SensorSource,
    pub lhm_url: String,
    pub lhm_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            gpu_enabled: true,
            gpu_index: DEFAULT_GPU_INDEX,
            sensor: SensorSource::default(),
            lhm_url: DEFAULT_LHM_URL.to_string(),
            lhm_timeout: Duration::from_millis(DEFAULT_LHM_TIMEOUT_MS),
        }
    }
}

/// Produces one `SampleSnapshot` per call.
///
/// Owns the OS provider, the optional GPU and temperature providers (probed
/// once, never reprobed) and the cumulative counter baselines. Device
/// handles are released when the sampler is dropped.
pub struct Sampler {
    system: Box<dyn SystemSource>,
    gpu: Option<Box<dyn GpuSource>>,
    sensor: Option<Box<dyn TemperatureSource>>,
    counters: CounterState,
    /// Groups whose last read failed; keeps repeated failures at debug level
    failing: HashSet<MetricGroup>,
}

impl Sampler {
    /// Open the OS provider and probe the optional devices.
    ///
    /// Fails only if the OS provider is unusable; missing GPU or sensor just
    /// disables that group.
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        let system = SysinfoSource::new()?;

        let gpu = if config.gpu_enabled {
            NvmlGpu::probe(config.gpu_index).map(|g| Box::new(g) as Box<dyn GpuSource>)
        } else {
            Err(SamplerError::unavailable(Device::Gpu, "disabled"))
        };

        Ok(Self::with_sources(
            Box::new(system),
            gpu,
            probe_sensor(config),
        ))
    }

    /// Assemble a sampler from already probed sources.
    pub fn with_sources(
        system: Box<dyn SystemSource>,
        gpu: Result<Box<dyn GpuSource>>,
        sensor: Result<Box<dyn TemperatureSource>>,
    ) -> Self {
        Self {
            system,
            gpu: accept_probe(gpu),
            sensor: accept_probe(sensor),
            counters: CounterState::new(Instant::now()),
            failing: HashSet::new(),
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn gpu_name(&self) -> Option<&str> {
        self.gpu.as_ref().map(|g| g.name())
    }

    pub fn has_temperature_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    /// Read every provider once and return a fresh snapshot.
    pub fn sample(&mut self) -> SampleSnapshot {
        self.sample_at(Instant::now())
    }

    /// `sample()` with an explicit capture instant.
    pub fn sample_at(&mut self, now: Instant) -> SampleSnapshot {
        let elapsed = self.counters.tick(now);
        trace!("sampling {:?} after previous call", elapsed);

        let cpu_percent = self.system.cpu_percent();
        let memory = self.system.memory();

        let cpu_temp_celsius = self.sensor.as_mut().and_then(|s| {
            absorb(
                &mut self.failing,
                MetricGroup::CpuTemperature,
                s.cpu_package_celsius(),
            )
        });

        let gpu = self
            .gpu
            .as_mut()
            .and_then(|g| absorb(&mut self.failing, MetricGroup::Gpu, g.read()));

        let network = absorb(
            &mut self.failing,
            MetricGroup::Network,
            self.system.network_totals(),
        )
        .map(|totals| self.counters.network_rates(totals, now));

        let disk = absorb(
            &mut self.failing,
            MetricGroup::Disk,
            self.system.disk_totals(),
        )
        .map(|totals| self.counters.disk_rates(totals, now));

        SampleSnapshot {
            timestamp: now,
            captured_at: Local::now(),
            elapsed,
            cpu_percent,
            cpu_temp_celsius,
            ram_used_bytes: memory.used_bytes,
            ram_total_bytes: memory.total_bytes,
            gpu,
            network,
            disk,
        }
    }
}

fn probe_sensor(config: &SamplerConfig) -> Result<Box<dyn TemperatureSource>> {
    let hwmon = || HwmonSensor::probe().map(|s| Box::new(s) as Box<dyn TemperatureSource>);
    let lhm = || {
        LhmSensor::probe(&config.lhm_url, config.lhm_timeout)
            .map(|s| Box::new(s) as Box<dyn TemperatureSource>)
    };

    match config.sensor {
        SensorSource::None => Err(SamplerError::unavailable(
            Device::TemperatureSensor,
            "disabled",
        )),
        SensorSource::Hwmon => hwmon(),
        SensorSource::Lhm => lhm(),
        SensorSource::Auto if cfg!(target_os = "linux") => hwmon(),
        SensorSource::Auto => lhm(),
    }
}

/// Keep a probed device, or log why its group is permanently off.
fn accept_probe<T>(probe: Result<T>) -> Option<T> {
    match probe {
        Ok(device) => Some(device),
        Err(e) => {
            info!("{}; group disabled", e);
            None
        }
    }
}

/// Turn a per-tick reading into an optional field, logging the first
/// failure of a streak at warn and the rest at debug.
fn absorb<T>(failing: &mut HashSet<MetricGroup>, group: MetricGroup, reading: Result<T>) -> Option<T> {
    match reading {
        Ok(value) => {
            if failing.remove(&group) {
                info!("{} readings recovered", group);
            }
            Some(value)
        }
        Err(e) => {
            if failing.insert(group) {
                warn!("{}", e);
            } else {
                debug!("{}", e);
            }
            None
        }
    }
}
