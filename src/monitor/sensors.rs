use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::constants::{CPU_HWMON_CHIPS, MAX_HWMON_SENSORS, MAX_THERMAL_ZONES};
use crate::error::{Device, MetricGroup, Result, SamplerError};

/// Optional hardware-sensor provider.
pub trait TemperatureSource: Send {
    /// CPU package temperature in Celsius.
    fn cpu_package_celsius(&mut self) -> Result<f32>;
}

/// A sysfs temperature input (millidegrees Celsius).
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFile {
    pub path: PathBuf,
    /// Human-readable origin, e.g. "coretemp/Package id 0"
    pub label: String,
}

/// CPU package temperature from Linux sysfs (hwmon, then thermal zones).
/// The input file is chosen once at probe time and re-read every tick.
pub struct HwmonSensor {
    file: SensorFile,
}

impl HwmonSensor {
    /// Locate a CPU temperature input under the default sysfs roots.
    pub fn probe() -> Result<Self> {
        Self::probe_in(Path::new("/sys/class/hwmon"), Path::new("/sys/class/thermal"))
    }

    pub fn probe_in(hwmon_root: &Path, thermal_root: &Path) -> Result<Self> {
        let file = find_hwmon_input(hwmon_root)
            .or_else(|| find_thermal_zone(thermal_root))
            .ok_or_else(|| {
                SamplerError::unavailable(Device::TemperatureSensor, "no CPU sensor in sysfs")
            })?;

        let mut sensor = Self { file };
        // The handle only counts if it reads now
        let first = sensor
            .cpu_package_celsius()
            .map_err(|e| SamplerError::unavailable(Device::TemperatureSensor, e))?;
        info!(
            "CPU temperature sensor: {} ({:.1}°C)",
            sensor.file.label, first
        );
        Ok(sensor)
    }

    #[cfg(test)]
    pub(crate) fn file(&self) -> &SensorFile {
        &self.file
    }
}

impl TemperatureSource for HwmonSensor {
    fn cpu_package_celsius(&mut self) -> Result<f32> {
        read_millidegrees(&self.file.path)
            .map_err(|e| SamplerError::transient(MetricGroup::CpuTemperature, e))
    }
}

/// Parse a sysfs temperature file (millidegrees Celsius).
fn read_millidegrees(path: &Path) -> std::result::Result<f32, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let millideg: f32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{}: not a number: {:?}", path.display(), raw.trim()))?;
    Ok(millideg / 1000.0)
}

fn read_trimmed(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Pick the package input of the first CPU hwmon chip.
/// Prefers a "package"/"tdie"/"tctl" label, else the chip's first input.
fn find_hwmon_input(root: &Path) -> Option<SensorFile> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        let chip = read_trimmed(&path.join("name"));
        if !CPU_HWMON_CHIPS.contains(&chip.as_str()) {
            continue;
        }

        let mut fallback: Option<SensorFile> = None;
        for i in 1..=MAX_HWMON_SENSORS {
            let input = path.join(format!("temp{}_input", i));
            if !input.exists() {
                continue;
            }
            let label = read_trimmed(&path.join(format!("temp{}_label", i)));
            let lower = label.to_lowercase();
            let display = if label.is_empty() {
                format!("{}/temp{}", chip, i)
            } else {
                format!("{}/{}", chip, label)
            };

            if lower.contains("package") || lower.contains("tdie") || lower.contains("tctl") {
                return Some(SensorFile {
                    path: input,
                    label: display,
                });
            }
            if fallback.is_none() {
                fallback = Some(SensorFile {
                    path: input,
                    label: display,
                });
            }
        }

        if let Some(found) = fallback {
            return Some(found);
        }
        debug!("hwmon chip {} has no temperature inputs", chip);
    }

    None
}

fn find_thermal_zone(root: &Path) -> Option<SensorFile> {
    for i in 0..MAX_THERMAL_ZONES {
        let zone = root.join(format!("thermal_zone{}", i));
        let zone_type = read_trimmed(&zone.join("type")).to_lowercase();
        if zone_type.contains("cpu")
            || zone_type.contains("x86_pkg")
            || zone_type.contains("acpitz")
            || zone_type.contains("soc")
        {
            let path = zone.join("temp");
            if path.exists() {
                return Some(SensorFile {
                    path,
                    label: format!("thermal_zone{}/{}", i, zone_type),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn prefers_package_label() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon = dir.path().join("hwmon");
        write(&hwmon.join("hwmon0/name"), "nvme\n");
        write(&hwmon.join("hwmon0/temp1_input"), "40000\n");
        write(&hwmon.join("hwmon1/name"), "coretemp\n");
        write(&hwmon.join("hwmon1/temp1_input"), "51000\n");
        write(&hwmon.join("hwmon1/temp1_label"), "Core 0\n");
        write(&hwmon.join("hwmon1/temp2_input"), "64500\n");
        write(&hwmon.join("hwmon1/temp2_label"), "Package id 0\n");

        let mut sensor = HwmonSensor::probe_in(&hwmon, &dir.path().join("thermal")).unwrap();
        assert_eq!(sensor.file().label, "coretemp/Package id 0");
        assert!((sensor.cpu_package_celsius().unwrap() - 64.5).abs() < 0.001);
    }

    #[test]
    fn falls_back_to_thermal_zone() {
        let dir = tempfile::tempdir().unwrap();
        let thermal = dir.path().join("thermal");
        write(&thermal.join("thermal_zone0/type"), "acpitz\n");
        write(&thermal.join("thermal_zone0/temp"), "47000\n");

        let mut sensor = HwmonSensor::probe_in(&dir.path().join("hwmon"), &thermal).unwrap();
        assert!((sensor.cpu_package_celsius().unwrap() - 47.0).abs() < 0.001);
    }

    #[test]
    fn missing_sensor_is_device_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = HwmonSensor::probe_in(&dir.path().join("a"), &dir.path().join("b"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SamplerError::DeviceUnavailable {
                device: Device::TemperatureSensor,
                ..
            }
        ));
    }

    #[test]
    fn vanished_file_is_transient() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon = dir.path().join("hwmon");
        write(&hwmon.join("hwmon0/name"), "k10temp\n");
        write(&hwmon.join("hwmon0/temp1_input"), "55000\n");
        write(&hwmon.join("hwmon0/temp1_label"), "Tctl\n");

        let mut sensor = HwmonSensor::probe_in(&hwmon, &dir.path().join("thermal")).unwrap();
        fs::remove_file(hwmon.join("hwmon0/temp1_input")).unwrap();
        let err = sensor.cpu_package_celsius().unwrap_err();
        assert!(matches!(
            err,
            SamplerError::TransientReadFailure {
                group: MetricGroup::CpuTemperature,
                ..
            }
        ));
    }
}
