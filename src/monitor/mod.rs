//! Metric sampling: providers, rate derivation, and the periodic driver.

mod counters;
mod driver;
mod gpu;
mod sampler;
mod sensors;
mod system;
#[cfg(test)]
pub(crate) mod testing;

pub use counters::rate;
pub use driver::{Capabilities, SamplerDriver, SnapshotReceiver};
pub use gpu::{GpuSource, NvmlGpu};
pub use sampler::{Sampler, SamplerConfig, SensorSource};
pub use sensors::{HwmonSensor, SensorFile, TemperatureSource};
pub use system::{parse_diskstats, SysinfoSource, SystemSource};
