//! Prometheus metrics exporter for sysmon.
//!
//! When enabled via `--prometheus <addr>`, runs a tiny HTTP server that exposes
//! the latest snapshot in Prometheus text exposition format at `/metrics`.
//!
//! The server holds a snapshot receiver and reads whatever the sampling thread
//! published last on each scrape request.

use log::{debug, info};

use crate::constants::PROM_BUFFER_CAPACITY;
use crate::models::SampleSnapshot;
use crate::monitor::SnapshotReceiver;
use crate::units::band;

/// Start the Prometheus metrics HTTP server on a background thread.
///
/// The server responds to `GET /metrics` with Prometheus text format.
/// All other paths return 404.
pub fn start_server(addr: &str, snapshots: SnapshotReceiver) -> Result<(), String> {
    let server = tiny_http::Server::http(addr)
        .map_err(|e| format!("Failed to bind Prometheus on {}: {}", addr, e))?;
    info!("Prometheus metrics on http://{}/metrics", addr);

    std::thread::Builder::new()
        .name("prometheus".into())
        .spawn(move || {
            for request in server.incoming_requests() {
                let is_metrics = request.url() == "/metrics";

                let response_text = if is_metrics {
                    let latest = snapshots.borrow().clone();
                    match latest {
                        Some(snap) => render_metrics(&snap),
                        None => "# no sample yet\n".to_string(),
                    }
                } else {
                    "404 Not Found\n".to_string()
                };

                let (status_code, content_type) = if is_metrics {
                    (200, "text/plain; version=0.0.4; charset=utf-8")
                } else {
                    (404, "text/plain")
                };

                let mut response =
                    tiny_http::Response::from_string(response_text).with_status_code(status_code);
                if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", content_type) {
                    response = response.with_header(header);
                }
                if let Err(e) = request.respond(response) {
                    debug!("Prometheus response failed: {}", e);
                }
            }
        })
        .map_err(|e| format!("Failed to start Prometheus thread: {}", e))?;

    Ok(())
}

// ── Metric definition helpers ────────────────────────────────

/// A metric definition: name and help text. Everything exported is a gauge.
struct MetricDef {
    name: &'static str,
    help: &'static str,
}

impl MetricDef {
    const fn gauge(name: &'static str, help: &'static str) -> Self {
        Self { name, help }
    }

    /// Write the HELP and TYPE lines for this metric.
    fn write_header(&self, out: &mut String) {
        out.push_str("# HELP ");
        out.push_str(self.name);
        out.push(' ');
        out.push_str(self.help);
        out.push('\n');
        out.push_str("# TYPE ");
        out.push_str(self.name);
        out.push_str(" gauge\n");
    }

    /// Write header + a single unlabeled value.
    fn emit(&self, out: &mut String, value: f64) {
        self.write_header(out);
        push_metric(out, self.name, &[], value);
    }
}

// ── Static metric definitions ────────────────────────────────

const M_CPU_USAGE: MetricDef =
    MetricDef::gauge("sysmon_cpu_usage_percent", "Global CPU usage percentage.");
const M_CPU_TEMP: MetricDef =
    MetricDef::gauge("sysmon_cpu_temp_celsius", "CPU package temperature.");
const M_MEM_TOTAL: MetricDef =
    MetricDef::gauge("sysmon_memory_total_bytes", "Total system memory in bytes.");
const M_MEM_USED: MetricDef =
    MetricDef::gauge("sysmon_memory_used_bytes", "Used system memory in bytes.");
const M_MEM_PCT: MetricDef =
    MetricDef::gauge("sysmon_memory_usage_percent", "Memory usage percentage.");
const M_BAND: MetricDef = MetricDef::gauge(
    "sysmon_band",
    "Severity band per metric (0 normal, 1 warning, 2 critical).",
);
const M_GPU_UTIL: MetricDef =
    MetricDef::gauge("sysmon_gpu_utilization_percent", "GPU utilization.");
const M_GPU_MEM_USED: MetricDef =
    MetricDef::gauge("sysmon_gpu_memory_used_bytes", "GPU memory used.");
const M_GPU_MEM_TOTAL: MetricDef =
    MetricDef::gauge("sysmon_gpu_memory_total_bytes", "GPU memory total.");
const M_GPU_TEMP: MetricDef = MetricDef::gauge("sysmon_gpu_temp_celsius", "GPU temperature.");
const M_NET_RX: MetricDef = MetricDef::gauge(
    "sysmon_network_receive_bytes_per_sec",
    "Network download rate over all interfaces.",
);
const M_NET_TX: MetricDef = MetricDef::gauge(
    "sysmon_network_transmit_bytes_per_sec",
    "Network upload rate over all interfaces.",
);
const M_DISK_READ: MetricDef =
    MetricDef::gauge("sysmon_disk_read_bytes_per_sec", "Disk read throughput.");
const M_DISK_WRITE: MetricDef =
    MetricDef::gauge("sysmon_disk_write_bytes_per_sec", "Disk write throughput.");

// ── Rendering ────────────────────────────────────────────────

/// Render a snapshot in Prometheus text exposition format.
/// Groups absent from the snapshot are left out entirely.
pub fn render_metrics(snap: &SampleSnapshot) -> String {
    let mut out = String::with_capacity(PROM_BUFFER_CAPACITY);

    out.push_str("# sysmon - Prometheus Metrics\n\n");

    // CPU
    M_CPU_USAGE.emit(&mut out, snap.cpu_percent as f64);
    if let Some(temp) = snap.cpu_temp_celsius {
        M_CPU_TEMP.emit(&mut out, temp as f64);
    }

    // Memory
    M_MEM_TOTAL.emit(&mut out, snap.ram_total_bytes as f64);
    M_MEM_USED.emit(&mut out, snap.ram_used_bytes as f64);
    M_MEM_PCT.emit(&mut out, snap.ram_percent() as f64);

    // GPU
    if let Some(ref gpu) = snap.gpu {
        M_GPU_UTIL.emit(&mut out, gpu.utilization_percent as f64);
        M_GPU_MEM_USED.emit(&mut out, gpu.vram_used_bytes as f64);
        M_GPU_MEM_TOTAL.emit(&mut out, gpu.vram_total_bytes as f64);
        if let Some(temp) = gpu.temp_celsius {
            M_GPU_TEMP.emit(&mut out, temp as f64);
        }
    }

    // Throughput
    if let Some(net) = snap.network {
        M_NET_RX.emit(&mut out, net.down_bytes_per_sec);
        M_NET_TX.emit(&mut out, net.up_bytes_per_sec);
    }
    if let Some(disk) = snap.disk {
        M_DISK_READ.emit(&mut out, disk.read_bytes_per_sec);
        M_DISK_WRITE.emit(&mut out, disk.write_bytes_per_sec);
    }

    // Bands
    M_BAND.write_header(&mut out);
    push_metric(
        &mut out,
        M_BAND.name,
        &[("metric", "cpu")],
        band(snap.cpu_percent) as u8 as f64,
    );
    push_metric(
        &mut out,
        M_BAND.name,
        &[("metric", "ram")],
        band(snap.ram_percent()) as u8 as f64,
    );
    if let Some(ref gpu) = snap.gpu {
        push_metric(
            &mut out,
            M_BAND.name,
            &[("metric", "gpu")],
            band(gpu.load_percent()) as u8 as f64,
        );
    }

    out
}

/// Write a single Prometheus metric line.
fn push_metric(out: &mut String, name: &str, labels: &[(&str, &str)], value: f64) {
    out.push_str(name);
    if !labels.is_empty() {
        out.push('{');
        for (i, (k, v)) in labels.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(k);
            out.push_str("=\"");
            // Escape label values for the text exposition format
            for ch in v.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
        out.push('}');
    }
    out.push(' ');
    // Use integer format for whole numbers, float otherwise
    if value.fract() == 0.0 && value.abs() < 1e15 {
        out.push_str(&format!("{}", value as i64));
    } else {
        out.push_str(&format!("{:.4}", value));
    }
    out.push('\n');
}
