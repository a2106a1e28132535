//! Scripted providers for sampler and driver tests.

use std::collections::VecDeque;

use super::gpu::GpuSource;
use super::sensors::TemperatureSource;
use super::system::SystemSource;
use crate::error::{Device, MetricGroup, Result, SamplerError};
use crate::models::{DiskTotals, GpuStats, MemoryUsage, NetworkTotals};

/// Replays scripted counter readings, one per call. An exhausted script
/// reads as a transient failure.
pub(crate) struct FakeSystem {
    pub(crate) net: VecDeque<Result<NetworkTotals>>,
    pub(crate) disk: VecDeque<Result<DiskTotals>>,
}

impl FakeSystem {
    pub(crate) fn new() -> Self {
        Self {
            net: VecDeque::new(),
            disk: VecDeque::new(),
        }
    }

    pub(crate) fn net(mut self, received: u64, sent: u64) -> Self {
        self.net.push_back(Ok(NetworkTotals {
            received_bytes: received,
            sent_bytes: sent,
        }));
        self
    }

    pub(crate) fn net_error(mut self) -> Self {
        self.net
            .push_back(Err(SamplerError::transient(MetricGroup::Network, "down")));
        self
    }

    pub(crate) fn disk(mut self, read: u64, written: u64) -> Self {
        self.disk.push_back(Ok(DiskTotals {
            read_bytes: read,
            written_bytes: written,
        }));
        self
    }
}

impl SystemSource for FakeSystem {
    fn cpu_percent(&mut self) -> f32 {
        37.5
    }

    fn memory(&mut self) -> MemoryUsage {
        MemoryUsage {
            used_bytes: 8 << 30,
            total_bytes: 16 << 30,
        }
    }

    fn network_totals(&mut self) -> Result<NetworkTotals> {
        self.net
            .pop_front()
            .unwrap_or_else(|| Err(SamplerError::transient(MetricGroup::Network, "unscripted")))
    }

    fn disk_totals(&mut self) -> Result<DiskTotals> {
        self.disk
            .pop_front()
            .unwrap_or_else(|| Err(SamplerError::transient(MetricGroup::Disk, "unscripted")))
    }
}

pub(crate) struct FakeGpu {
    pub(crate) reads: VecDeque<Result<GpuStats>>,
}

impl GpuSource for FakeGpu {
    fn name(&self) -> &str {
        "Fake RTX"
    }

    fn read(&mut self) -> Result<GpuStats> {
        self.reads
            .pop_front()
            .unwrap_or_else(|| Err(SamplerError::transient(MetricGroup::Gpu, "unscripted")))
    }
}

pub(crate) struct FakeSensor {
    pub(crate) reads: VecDeque<Result<f32>>,
}

impl TemperatureSource for FakeSensor {
    fn cpu_package_celsius(&mut self) -> Result<f32> {
        self.reads.pop_front().unwrap_or_else(|| {
            Err(SamplerError::transient(
                MetricGroup::CpuTemperature,
                "unscripted",
            ))
        })
    }
}

pub(crate) fn gpu_stats(util: f32) -> GpuStats {
    GpuStats {
        utilization_percent: util,
        temp_celsius: Some(55.0),
        vram_used_bytes: 2 << 30,
        vram_total_bytes: 8 << 30,
    }
}

pub(crate) fn no_gpu() -> Result<Box<dyn GpuSource>> {
    Err(SamplerError::unavailable(Device::Gpu, "none"))
}

pub(crate) fn no_sensor() -> Result<Box<dyn TemperatureSource>> {
    Err(SamplerError::unavailable(Device::TemperatureSensor, "none"))
}
