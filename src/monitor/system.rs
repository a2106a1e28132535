use log::debug;
use sysinfo::{Networks, System};

use crate::constants::*;
use crate::error::{MetricGroup, Result, SamplerError};
use crate::models::{DiskTotals, MemoryUsage, NetworkTotals};

/// Core OS metrics provider. CPU and memory always read; the cumulative
/// counter groups may fail per call.
pub trait SystemSource: Send {
    /// Global CPU utilization (0-100) since the previous call.
    fn cpu_percent(&mut self) -> f32;
    fn memory(&mut self) -> MemoryUsage;
    /// Cumulative bytes received/sent over all interfaces.
    fn network_totals(&mut self) -> Result<NetworkTotals>;
    /// Cumulative bytes read/written over all physical disks.
    fn disk_totals(&mut self) -> Result<DiskTotals>;
}

/// `SystemSource` backed by sysinfo (CPU, memory, network) and the
/// platform's disk counters.
pub struct SysinfoSource {
    sys: System,
    networks: Networks,
}

impl SysinfoSource {
    pub fn new() -> Result<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SamplerError::FatalInitFailure(format!(
                "sysinfo does not support {}",
                std::env::consts::OS
            )));
        }

        let mut sys = System::new();
        sys.refresh_memory();
        if sys.total_memory() == 0 {
            return Err(SamplerError::FatalInitFailure(
                "total memory reported as zero".into(),
            ));
        }
        // Prime CPU usage so the first sample compares against construction time
        sys.refresh_cpu_usage();

        let networks = Networks::new_with_refreshed_list();
        debug!(
            "sysinfo ready: {} MiB memory, {} network interfaces",
            sys.total_memory() / (1024 * 1024),
            networks.iter().count()
        );

        Ok(Self { sys, networks })
    }
}

impl SystemSource for SysinfoSource {
    fn cpu_percent(&mut self) -> f32 {
        self.sys.refresh_cpu_usage();
        self.sys.global_cpu_usage().clamp(0.0, 100.0)
    }

    fn memory(&mut self) -> MemoryUsage {
        self.sys.refresh_memory();
        MemoryUsage {
            used_bytes: self.sys.used_memory(),
            total_bytes: self.sys.total_memory(),
        }
    }

    fn network_totals(&mut self) -> Result<NetworkTotals> {
        self.networks.refresh();
        let mut interfaces = 0usize;
        let totals = self
            .networks
            .iter()
            .fold(NetworkTotals::default(), |acc, (_, data)| {
                interfaces += 1;
                NetworkTotals {
                    received_bytes: acc.received_bytes.saturating_add(data.total_received()),
                    sent_bytes: acc.sent_bytes.saturating_add(data.total_transmitted()),
                }
            });

        if interfaces == 0 {
            return Err(SamplerError::transient(
                MetricGroup::Network,
                "no network interfaces",
            ));
        }
        Ok(totals)
    }

    #[cfg(target_os = "linux")]
    fn disk_totals(&mut self) -> Result<DiskTotals> {
        let content = std::fs::read_to_string("/proc/diskstats")
            .map_err(|e| SamplerError::transient(MetricGroup::Disk, e))?;
        Ok(parse_diskstats(&content, |name| {
            std::path::Path::new("/sys/block").join(name).exists()
        }))
    }

    #[cfg(not(target_os = "linux"))]
    fn disk_totals(&mut self) -> Result<DiskTotals> {
        use sysinfo::{ProcessRefreshKind, ProcessesToUpdate};

        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_disk_usage(),
        );
        if self.sys.processes().is_empty() {
            return Err(SamplerError::transient(
                MetricGroup::Disk,
                "no process I/O counters",
            ));
        }
        // Exited processes take their totals with them; the rate logic
        // treats the resulting drop as a reset.
        Ok(self
            .sys
            .processes()
            .values()
            .fold(DiskTotals::default(), |acc, p| {
                let usage = p.disk_usage();
                DiskTotals {
                    read_bytes: acc.read_bytes.saturating_add(usage.total_read_bytes),
                    written_bytes: acc.written_bytes.saturating_add(usage.total_written_bytes),
                }
            }))
    }
}

/// Sum read/written bytes from /proc/diskstats content.
///
/// Only whole block devices count (`is_whole_disk`), so partitions are not
/// added on top of their parent disk. Virtual devices are skipped.
pub fn parse_diskstats(content: &str, is_whole_disk: impl Fn(&str) -> bool) -> DiskTotals {
    let mut totals = DiskTotals::default();

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_DISKSTATS_FIELDS {
            continue;
        }

        let name = fields[2];
        if VIRTUAL_BLOCK_PREFIXES.iter().any(|p| name.starts_with(p)) || !is_whole_disk(name) {
            continue;
        }

        // Field 5 = sectors read, Field 9 = sectors written
        let sectors_read: u64 = fields[5].parse().unwrap_or(0);
        let sectors_written: u64 = fields[9].parse().unwrap_or(0);
        totals.read_bytes = totals
            .read_bytes
            .saturating_add(sectors_read.saturating_mul(SECTOR_SIZE_BYTES));
        totals.written_bytes = totals
            .written_bytes
            .saturating_add(sectors_written.saturating_mul(SECTOR_SIZE_BYTES));
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISKSTATS: &str = "\
   7       0 loop0 120 0 4000 10 0 0 0 0 0 20 10 0 0 0 0
   8       0 sda 1000 50 2048 300 500 20 4096 800 0 900 1100 0 0 0 0
   8       1 sda1 900 40 2000 280 480 18 4000 780 0 850 1060 0 0 0 0
 259       0 nvme0n1 10 0 100 1 20 0 200 2 0 3 3 0 0 0 0
 259       1 nvme0n1p1 10 0 100 1 20 0 200 2 0 3 3 0 0 0 0
 253       0 dm-0 800 0 1800 200 450 0 3900 700 0 800 900 0 0 0 0
   1       0 ram0 0 0 0 0 0 0 0 0 0 0 0
";

    fn whole(name: &str) -> bool {
        matches!(name, "loop0" | "sda" | "nvme0n1" | "dm-0" | "ram0")
    }

    #[test]
    fn diskstats_sums_whole_physical_disks() {
        let totals = parse_diskstats(DISKSTATS, whole);
        assert_eq!(totals.read_bytes, (2048 + 100) * 512);
        assert_eq!(totals.written_bytes, (4096 + 200) * 512);
    }

    #[test]
    fn diskstats_skips_short_and_empty_lines() {
        let totals = parse_diskstats("8 0 sda 1 2\n\n", |_| true);
        assert_eq!(totals, DiskTotals::default());
    }

    #[test]
    fn diskstats_tolerates_garbage_fields() {
        let line = "8 0 sda x 0 nope 0 0 0 16 0 0 0 0 0\n";
        let totals = parse_diskstats(line, |_| true);
        assert_eq!(totals.read_bytes, 0);
        assert_eq!(totals.written_bytes, 16 * 512);
    }

    #[test]
    fn diskstats_huge_sector_counts_saturate() {
        let line = format!("8 0 sda 1 0 {} 0 0 0 {} 0 0 0 0 0\n", u64::MAX, u64::MAX / 256);
        let totals = parse_diskstats(&line, |_| true);
        assert_eq!(totals.read_bytes, u64::MAX);
        assert_eq!(totals.written_bytes, u64::MAX);
    }

    #[test]
    fn sysinfo_source_reads_memory() {
        // Works on any platform sysinfo supports
        if let Ok(mut source) = SysinfoSource::new() {
            let mem = source.memory();
            assert!(mem.total_bytes > 0);
            assert!(mem.used_bytes <= mem.total_bytes);
            let cpu = source.cpu_percent();
            assert!((0.0..=100.0).contains(&cpu));
        }
    }
}
