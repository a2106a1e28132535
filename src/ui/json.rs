//! Machine-readable layout: one JSON object per tick.

use serde_json::json;

use crate::models::SampleSnapshot;
use crate::units::band;

/// Render every value regardless of display toggles. Absent values are
/// `null`; temperatures stay in Celsius.
pub fn render_json(snap: &SampleSnapshot) -> String {
    let gpu = snap.gpu.as_ref().map(|g| {
        json!({
            "utilization_percent": g.utilization_percent,
            "temp_celsius": g.temp_celsius,
            "vram_used_bytes": g.vram_used_bytes,
            "vram_total_bytes": g.vram_total_bytes,
            "band": band(g.load_percent()).as_str(),
        })
    });

    json!({
        "captured_at": snap.captured_at.to_rfc3339(),
        "interval_secs": snap.elapsed.as_secs_f64(),
        "cpu_percent": snap.cpu_percent,
        "cpu_band": band(snap.cpu_percent).as_str(),
        "cpu_temp_celsius": snap.cpu_temp_celsius,
        "ram_used_bytes": snap.ram_used_bytes,
        "ram_total_bytes": snap.ram_total_bytes,
        "ram_percent": snap.ram_percent(),
        "ram_band": band(snap.ram_percent()).as_str(),
        "gpu": gpu,
        "net_down_bytes_per_sec": snap.net_down_bytes_per_sec(),
        "net_up_bytes_per_sec": snap.net_up_bytes_per_sec(),
        "disk_read_bytes_per_sec": snap.disk_read_bytes_per_sec(),
        "disk_write_bytes_per_sec": snap.disk_write_bytes_per_sec(),
    })
    .to_string()
}
