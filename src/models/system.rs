use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// One immutable sampling result.
/// Each optional group is absent when its provider is missing or failed this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSnapshot {
    /// Monotonic capture instant
    pub timestamp: Instant,
    /// Wall-clock capture time (display only)
    pub captured_at: DateTime<Local>,
    /// Time since the previous sample (or sampler construction)
    pub elapsed: Duration,
    /// 0-100, since previous tick
    pub cpu_percent: f32,
    /// CPU package temperature in Celsius (None if no sensor or read failed)
    pub cpu_temp_celsius: Option<f32>,
    pub ram_used_bytes: u64,
    pub ram_total_bytes: u64,
    /// GPU block (None if no device handle or query failed)
    pub gpu: Option<GpuStats>,
    /// Network throughput (None if the counters could not be read)
    pub network: Option<NetworkRates>,
    /// Disk throughput (None if the counters could not be read)
    pub disk: Option<DiskRates>,
}

impl SampleSnapshot {
    pub fn ram_percent(&self) -> f32 {
        if self.ram_total_bytes == 0 {
            return 0.0;
        }
        (self.ram_used_bytes as f64 / self.ram_total_bytes as f64 * 100.0) as f32
    }

    pub fn gpu_percent(&self) -> Option<f32> {
        self.gpu.as_ref().map(|g| g.utilization_percent)
    }

    pub fn gpu_temp_celsius(&self) -> Option<f32> {
        self.gpu.as_ref().and_then(|g| g.temp_celsius)
    }

    pub fn vram_used_bytes(&self) -> Option<u64> {
        self.gpu.as_ref().map(|g| g.vram_used_bytes)
    }

    pub fn vram_total_bytes(&self) -> Option<u64> {
        self.gpu.as_ref().map(|g| g.vram_total_bytes)
    }

    pub fn net_down_bytes_per_sec(&self) -> Option<f64> {
        self.network.map(|n| n.down_bytes_per_sec)
    }

    pub fn net_up_bytes_per_sec(&self) -> Option<f64> {
        self.network.map(|n| n.up_bytes_per_sec)
    }

    pub fn disk_read_bytes_per_sec(&self) -> Option<f64> {
        self.disk.map(|d| d.read_bytes_per_sec)
    }

    pub fn disk_write_bytes_per_sec(&self) -> Option<f64> {
        self.disk.map(|d| d.write_bytes_per_sec)
    }
}

/// GPU snapshot for the active device.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuStats {
    pub utilization_percent: f32, // 0-100%
    pub temp_celsius: Option<f32>,
    pub vram_used_bytes: u64,
    pub vram_total_bytes: u64,
}

impl GpuStats {
    pub fn vram_percent(&self) -> f32 {
        if self.vram_total_bytes == 0 {
            return 0.0;
        }
        (self.vram_used_bytes as f64 / self.vram_total_bytes as f64 * 100.0) as f32
    }

    /// The larger of core utilization and VRAM usage; drives the GPU band.
    pub fn load_percent(&self) -> f32 {
        self.utilization_percent.max(self.vram_percent())
    }
}

/// Network throughput summed over all interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkRates {
    pub down_bytes_per_sec: f64,
    pub up_bytes_per_sec: f64,
}

/// Disk throughput summed over all physical block devices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiskRates {
    pub read_bytes_per_sec: f64,
    pub write_bytes_per_sec: f64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Raw provider readings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Virtual memory reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// Cumulative network counters since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkTotals {
    pub received_bytes: u64,
    pub sent_bytes: u64,
}

/// Cumulative disk counters since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskTotals {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(used: u64, total: u64) -> SampleSnapshot {
        SampleSnapshot {
            timestamp: Instant::now(),
            captured_at: Local::now(),
            elapsed: Duration::from_secs(1),
            cpu_percent: 0.0,
            cpu_temp_celsius: None,
            ram_used_bytes: used,
            ram_total_bytes: total,
            gpu: None,
            network: None,
            disk: None,
        }
    }

    #[test]
    fn ram_percent_derived_from_bytes() {
        let snap = snapshot(4 * 1024, 16 * 1024);
        assert!((snap.ram_percent() - 25.0).abs() < 0.001);
    }

    #[test]
    fn ram_percent_zero_total() {
        assert_eq!(snapshot(10, 0).ram_percent(), 0.0);
    }

    #[test]
    fn gpu_load_is_max_of_core_and_vram() {
        let gpu = GpuStats {
            utilization_percent: 20.0,
            temp_celsius: Some(50.0),
            vram_used_bytes: 6,
            vram_total_bytes: 8,
        };
        assert!((gpu.vram_percent() - 75.0).abs() < 0.001);
        assert!((gpu.load_percent() - 75.0).abs() < 0.001);

        let busy = GpuStats {
            utilization_percent: 95.0,
            ..gpu
        };
        assert!((busy.load_percent() - 95.0).abs() < 0.001);
    }

    #[test]
    fn absent_groups_flatten_to_none() {
        let snap = snapshot(1, 2);
        assert_eq!(snap.gpu_percent(), None);
        assert_eq!(snap.gpu_temp_celsius(), None);
        assert_eq!(snap.vram_total_bytes(), None);
        assert_eq!(snap.net_down_bytes_per_sec(), None);
        assert_eq!(snap.disk_write_bytes_per_sec(), None);
    }
}
