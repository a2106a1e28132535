//! # sysmon
//!
//! A polling system metrics sampler: CPU utilization and temperature, RAM, an
//! optional NVIDIA GPU, and network and disk throughput derived from
//! cumulative counters. Snapshots are produced on a dedicated thread and
//! handed to presentation adapters and an optional Prometheus endpoint.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod models;
pub mod monitor;
pub mod thermal;
pub mod ui;
pub mod units;

pub use error::{Result, SamplerError};
pub use models::SampleSnapshot;
pub use monitor::{Sampler, SamplerConfig, SamplerDriver};
