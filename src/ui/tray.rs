//! Tray tooltips, one per icon.

use super::DisplayOptions;
use crate::constants::PLACEHOLDER;
use crate::models::SampleSnapshot;
use crate::units::{bytes_to_gib, format_kib_rate, format_mib_rate, format_temp};

/// Tooltip text for each enabled icon, in icon order.
/// No GPU icon is shown on a machine without one, and the CPU tooltip only
/// carries a temperature when a sensor exists.
pub fn render_tray(snap: &SampleSnapshot, opts: &DisplayOptions) -> Vec<String> {
    let mut tips = Vec::with_capacity(5);

    if opts.show_cpu {
        let mut tip = format!("CPU: {:.0}%", snap.cpu_percent);
        if opts.temperature_sensor {
            tip.push_str(" | ");
            tip.push_str(&format_temp(snap.cpu_temp_celsius, opts.unit));
        }
        tips.push(tip);
    }

    if opts.show_ram {
        tips.push(format!(
            "RAM: {:.1}/{:.0} GB ({:.0}%)",
            bytes_to_gib(snap.ram_used_bytes),
            bytes_to_gib(snap.ram_total_bytes),
            snap.ram_percent()
        ));
    }

    if opts.show_gpu && opts.gpu_name.is_some() {
        tips.push(match &snap.gpu {
            Some(gpu) => format!(
                "GPU: {:.0}% | VRAM: {:.1}/{:.0}GB | {}",
                gpu.utilization_percent,
                bytes_to_gib(gpu.vram_used_bytes),
                bytes_to_gib(gpu.vram_total_bytes),
                format_temp(gpu.temp_celsius, opts.unit)
            ),
            None => format!("GPU: {}", PLACEHOLDER),
        });
    }

    if opts.show_net {
        tips.push(format!(
            "NET: ↓ {} ↑ {} KB/s",
            format_kib_rate(snap.net_down_bytes_per_sec(), 0),
            format_kib_rate(snap.net_up_bytes_per_sec(), 0)
        ));
    }

    if opts.show_disk {
        tips.push(format!(
            "DISK: R: {} W: {} MB/s",
            format_mib_rate(snap.disk_read_bytes_per_sec(), 0),
            format_mib_rate(snap.disk_write_bytes_per_sec(), 0)
        ));
    }

    tips
}
