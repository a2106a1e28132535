//! CPU package temperature via LibreHardwareMonitor's HTTP JSON API.
//!
//! LHM exposes a tree of hardware → sub-hardware → sensors at `/data.json`.
//! The sampler only needs one value out of it, so the tree is walked once
//! per poll looking for the CPU package temperature.
//!
//! LHM being unreachable at construction disables the sensor for the
//! sampler's lifetime; a failed poll later only blanks that tick.

use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::error::{Device, MetricGroup, Result, SamplerError};
use crate::monitor::TemperatureSource;

/// Blocking client for LibreHardwareMonitor's HTTP JSON endpoint.
/// Must live on a plain thread, not inside the async runtime.
pub struct LhmSensor {
    url: String,
    client: reqwest::blocking::Client,
}

impl LhmSensor {
    /// Build the client and require one successful poll.
    pub fn probe(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SamplerError::unavailable(Device::TemperatureSensor, e))?;

        let mut sensor = Self {
            url: url.to_string(),
            client,
        };
        let first = sensor
            .cpu_package_celsius()
            .map_err(|e| SamplerError::unavailable(Device::TemperatureSensor, e))?;
        info!("LibreHardwareMonitor at {}: CPU {:.1}°C", url, first);
        Ok(sensor)
    }

    fn poll(&self) -> std::result::Result<LhmNode, reqwest::Error> {
        self.client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json::<LhmNode>()
    }
}

impl TemperatureSource for LhmSensor {
    fn cpu_package_celsius(&mut self) -> Result<f32> {
        let root = self
            .poll()
            .map_err(|e| SamplerError::transient(MetricGroup::CpuTemperature, e))?;
        find_cpu_package(&root).ok_or_else(|| {
            SamplerError::transient(MetricGroup::CpuTemperature, "no CPU package sensor in LHM tree")
        })
    }
}

// ── LHM JSON structures ──────────────────────────────────────────

/// LHM tree node: represents a hardware item or sensor group.
/// The JSON is recursive: each node can have `Children` containing more nodes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LhmNode {
    /// Display text, e.g. "Intel Core i7-10700K" or "CPU Core #1: 65 °C".
    #[serde(default)]
    text: String,
    #[serde(default)]
    children: Vec<LhmNode>,
    /// Current value (present on sensor nodes), e.g. "65.2 °C" or "1200 RPM".
    #[serde(default)]
    value: String,
    /// "images/cpu.png", "images/nvidia.png", etc. for hardware nodes.
    #[serde(default, rename = "ImageURL")]
    image_url: String,
}

/// Parse the LHM JSON text and return the CPU package temperature.
pub(crate) fn parse_cpu_package(json_str: &str) -> Option<f32> {
    let root: LhmNode = serde_json::from_str(json_str).ok()?;
    find_cpu_package(&root)
}

/// CPU temperatures found while walking the tree, best match first.
#[derive(Default)]
struct CpuTemps {
    package: Option<f32>,
    other: Option<f32>,
}

fn find_cpu_package(root: &LhmNode) -> Option<f32> {
    let mut found = CpuTemps::default();
    walk(root, false, false, &mut found);
    found.package.or(found.other)
}

fn walk(node: &LhmNode, in_cpu: bool, in_temps: bool, found: &mut CpuTemps) {
    let text = node.text.trim();
    let in_cpu = in_cpu || is_cpu_hardware(node);
    let in_temps = (in_temps || text == "Temperatures") && !is_other_category(text);

    if in_cpu && in_temps && node.children.is_empty() && !node.value.is_empty() {
        if let Some(value) = parse_sensor_value(&node.value) {
            let name = text.split(':').next().unwrap_or(text).to_lowercase();
            if name.contains("package") || name.contains("tctl") || name.contains("tdie") {
                found.package.get_or_insert(value);
            } else if name.contains("cpu") || name.contains("core") {
                found.other.get_or_insert(value);
            }
        }
    }

    for child in &node.children {
        walk(child, in_cpu, in_temps, found);
    }
}

fn is_other_category(text: &str) -> bool {
    matches!(
        text,
        "Fans" | "Voltages" | "Clocks" | "Powers" | "Load" | "Data" | "Throughput"
    )
}

fn is_cpu_hardware(node: &LhmNode) -> bool {
    if node.image_url.contains("cpu") {
        return true;
    }
    let text = node.text.to_lowercase();
    node.value.is_empty()
        && (text.contains("intel core") || text.contains("amd ryzen") || text.contains("processor"))
}

/// Parse a sensor value string like "65.2 °C", "1200 RPM", "0.8 V" into f32.
fn parse_sensor_value(s: &str) -> Option<f32> {
    let s = s.trim();
    if s.is_empty() || s == "-" || s == "N/A" {
        return None;
    }
    let num_str: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    num_str.replace(',', ".").parse::<f32>().ok()
}
