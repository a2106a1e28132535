use log::{debug, info, warn};
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Nvml;

use crate::error::{Device, MetricGroup, Result, SamplerError};
use crate::models::GpuStats;

/// Optional GPU metrics provider for one device.
pub trait GpuSource: Send {
    /// Device name reported at probe time.
    fn name(&self) -> &str;
    /// Current utilization, temperature and memory of the device.
    fn read(&mut self) -> Result<GpuStats>;
}

/// NVIDIA GPU via NVML. Owns the library handle; NVML is shut down once,
/// when this value is dropped.
pub struct NvmlGpu {
    /// Always `Some` until drop
    nvml: Option<Nvml>,
    index: u32,
    name: String,
}

impl NvmlGpu {
    /// Initialize NVML and check that device `index` answers.
    pub fn probe(index: u32) -> Result<Self> {
        let nvml = Nvml::init().map_err(|e| SamplerError::unavailable(Device::Gpu, e))?;
        let name = {
            let device = nvml
                .device_by_index(index)
                .map_err(|e| SamplerError::unavailable(Device::Gpu, e))?;
            device.name().unwrap_or_else(|_| "NVIDIA GPU".to_string())
        };
        info!("NVIDIA GPU {}: {}", index, name);

        Ok(Self {
            nvml: Some(nvml),
            index,
            name,
        })
    }
}

impl GpuSource for NvmlGpu {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<GpuStats> {
        let nvml = self
            .nvml
            .as_ref()
            .ok_or_else(|| SamplerError::transient(MetricGroup::Gpu, "NVML already shut down"))?;
        let device = nvml
            .device_by_index(self.index)
            .map_err(|e| SamplerError::transient(MetricGroup::Gpu, e))?;

        let utilization = device
            .utilization_rates()
            .map_err(|e| SamplerError::transient(MetricGroup::Gpu, e))?;
        let memory = device
            .memory_info()
            .map_err(|e| SamplerError::transient(MetricGroup::Gpu, e))?;
        // Some boards do not expose a core sensor; keep the rest of the group
        let temp_celsius = match device.temperature(TemperatureSensor::Gpu) {
            Ok(t) => Some(t as f32),
            Err(e) => {
                debug!("GPU temperature unavailable this tick: {}", e);
                None
            }
        };

        Ok(GpuStats {
            utilization_percent: utilization.gpu.min(100) as f32,
            temp_celsius,
            vram_used_bytes: memory.used,
            vram_total_bytes: memory.total,
        })
    }
}

impl Drop for NvmlGpu {
    fn drop(&mut self) {
        if let Some(nvml) = self.nvml.take() {
            match nvml.shutdown() {
                Ok(()) => debug!("NVML shut down"),
                Err(e) => warn!("NVML shutdown failed: {}", e),
            }
        }
    }
}
