//! Single-line status bar, the powerbar layout.

use super::DisplayOptions;
use crate::constants::PLACEHOLDER;
use crate::models::SampleSnapshot;
use crate::units::{bytes_to_gib, format_kib_rate, format_mib_rate, format_temp};

const SEPARATOR: &str = " │ ";

/// Render every enabled section on one line.
///
/// The GPU sections disappear when the machine has no GPU, and show the
/// placeholder when the device exists but this tick's query failed.
pub fn render_bar(snap: &SampleSnapshot, opts: &DisplayOptions) -> String {
    let label = |name: &str| {
        if opts.show_labels {
            format!("{}: ", name)
        } else {
            String::new()
        }
    };
    let mut sections: Vec<String> = Vec::with_capacity(7);

    if opts.show_cpu {
        sections.push(format!(
            "{}{:>3.0}% {}",
            label("CPU"),
            snap.cpu_percent,
            format_temp(snap.cpu_temp_celsius, opts.unit)
        ));
    }

    if opts.show_ram {
        sections.push(format!(
            "{}{:>3.0}% ({:.0}/{:.0}GB)",
            label("RAM"),
            snap.ram_percent(),
            bytes_to_gib(snap.ram_used_bytes),
            bytes_to_gib(snap.ram_total_bytes)
        ));
    }

    if opts.show_gpu && opts.gpu_name.is_some() {
        match &snap.gpu {
            Some(gpu) => {
                sections.push(format!("{}{:>3.0}%", label("GPU"), gpu.utilization_percent));
                sections.push(format!(
                    "{}{:.1}/{:.0}GB",
                    label("VRAM"),
                    bytes_to_gib(gpu.vram_used_bytes),
                    bytes_to_gib(gpu.vram_total_bytes)
                ));
                sections.push(format_temp(gpu.temp_celsius, opts.unit));
            }
            None => sections.push(format!("{}{:>4}", label("GPU"), PLACEHOLDER)),
        }
    }

    if opts.show_net {
        sections.push(format!(
            "{}↓{} ↑{} KB/s",
            label("NET"),
            format_kib_rate(snap.net_down_bytes_per_sec(), 5),
            format_kib_rate(snap.net_up_bytes_per_sec(), 5)
        ));
    }

    if opts.show_disk {
        sections.push(format!(
            "{}R: {} W: {} MB/s",
            label("DISK"),
            format_mib_rate(snap.disk_read_bytes_per_sec(), 0),
            format_mib_rate(snap.disk_write_bytes_per_sec(), 0)
        ));
    }

    sections.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::*;
    use crate::units::TempUnit;

    fn opts_with_gpu() -> DisplayOptions {
        DisplayOptions {
            unit: TempUnit::Celsius,
            gpu_name: Some("Fake RTX".into()),
            ..DisplayOptions::default()
        }
    }

    #[test]
    fn full_line() {
        assert_eq!(
            render_bar(&full_snapshot(), &opts_with_gpu()),
            "CPU:  42% 65°C │ RAM:  56% (9/16GB) │ GPU:  12% │ VRAM: 1.2/8GB │ 45°C │ \
             NET: ↓  120 ↑   10 KB/s │ DISK: R: 1.2 W: 0.3 MB/s"
        );
    }

    #[test]
    fn absent_values_use_placeholder() {
        let line = render_bar(&bare_snapshot(), &opts_with_gpu());
        assert_eq!(
            line,
            "CPU:  42% -- │ RAM:  56% (9/16GB) │ GPU:   -- │ \
             NET: ↓   -- ↑   -- KB/s │ DISK: R: -- W: -- MB/s"
        );
    }

    #[test]
    fn gpu_hidden_without_device() {
        let opts = DisplayOptions {
            gpu_name: None,
            ..opts_with_gpu()
        };
        let line = render_bar(&full_snapshot(), &opts);
        assert!(!line.contains("GPU"));
        assert!(!line.contains("VRAM"));
    }

    #[test]
    fn toggles_and_labels() {
        let opts = DisplayOptions {
            show_ram: false,
            show_gpu: false,
            show_net: false,
            show_disk: false,
            show_labels: false,
            ..opts_with_gpu()
        };
        assert_eq!(render_bar(&full_snapshot(), &opts), " 42% 65°C");
    }

    #[test]
    fn fahrenheit_by_default_unit() {
        let opts = DisplayOptions {
            unit: TempUnit::Fahrenheit,
            show_ram: false,
            show_gpu: false,
            show_net: false,
            show_disk: false,
            ..opts_with_gpu()
        };
        assert_eq!(render_bar(&full_snapshot(), &opts), "CPU:  42% 149°F");
    }
}
