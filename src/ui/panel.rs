//! Card-per-metric panel layout.
//!
//! Each card is one line: a fixed-width title, the headline value, and a
//! sub line with detail. Cards past the normal band carry the band name.

use super::DisplayOptions;
use crate::constants::PLACEHOLDER;
use crate::models::SampleSnapshot;
use crate::units::{band, bytes_to_gib, format_kib_rate, format_mib_rate, format_temp, Band};

struct Card {
    title: &'static str,
    value: String,
    sub: String,
    band: Option<Band>,
}

impl Card {
    fn render(&self) -> String {
        let mut line = format!("{:<5}{:>6}  {}", self.title, self.value, self.sub);
        match self.band {
            Some(b) if b != Band::Normal => {
                line.push_str("  [");
                line.push_str(b.as_str());
                line.push(']');
            }
            _ => {}
        }
        line.trim_end().to_string()
    }
}

pub fn render_panel(snap: &SampleSnapshot, opts: &DisplayOptions) -> String {
    let mut cards = Vec::with_capacity(5);

    if opts.show_cpu {
        cards.push(Card {
            title: "CPU",
            value: format!("{:.0}%", snap.cpu_percent),
            sub: format_temp(snap.cpu_temp_celsius, opts.unit),
            band: Some(band(snap.cpu_percent)),
        });
    }

    if opts.show_ram {
        cards.push(Card {
            title: "RAM",
            value: format!("{:.0}%", snap.ram_percent()),
            sub: format!(
                "{:.1}/{:.0} GB",
                bytes_to_gib(snap.ram_used_bytes),
                bytes_to_gib(snap.ram_total_bytes)
            ),
            band: Some(band(snap.ram_percent())),
        });
    }

    if opts.show_gpu {
        let card = match (&opts.gpu_name, &snap.gpu) {
            (None, _) => Card {
                title: "GPU",
                value: "N/A".into(),
                sub: "No GPU".into(),
                band: None,
            },
            (Some(name), None) => Card {
                title: "GPU",
                value: PLACEHOLDER.into(),
                sub: name.clone(),
                band: None,
            },
            (Some(_), Some(gpu)) => Card {
                title: "GPU",
                value: format!("{:.0}%", gpu.utilization_percent),
                sub: format!(
                    "VRAM {:.1}/{:.0} GB, {}",
                    bytes_to_gib(gpu.vram_used_bytes),
                    bytes_to_gib(gpu.vram_total_bytes),
                    format_temp(gpu.temp_celsius, opts.unit)
                ),
                band: Some(band(gpu.load_percent())),
            },
        };
        cards.push(card);
    }

    if opts.show_net {
        cards.push(Card {
            title: "NET",
            value: format!("↓{}", format_kib_rate(snap.net_down_bytes_per_sec(), 0)),
            sub: format!("↑{} KB/s", format_kib_rate(snap.net_up_bytes_per_sec(), 0)),
            band: None,
        });
    }

    if opts.show_disk {
        cards.push(Card {
            title: "DISK",
            value: format!("R {}", format_mib_rate(snap.disk_read_bytes_per_sec(), 0)),
            sub: format!("W {} MB/s", format_mib_rate(snap.disk_write_bytes_per_sec(), 0)),
            band: None,
        });
    }

    cards
        .iter()
        .map(Card::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::*;
    use crate::units::TempUnit;

    fn opts() -> DisplayOptions {
        DisplayOptions {
            unit: TempUnit::Celsius,
            gpu_name: Some("Fake RTX".into()),
            ..DisplayOptions::default()
        }
    }

    #[test]
    fn one_card_per_metric() {
        let panel = render_panel(&full_snapshot(), &opts());
        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CPU     42%  65°C",
                "RAM     56%  9.0/16 GB",
                "GPU     12%  VRAM 1.2/8 GB, 45°C",
                "NET    ↓120  ↑10 KB/s",
                "DISK  R 1.2  W 0.3 MB/s",
            ]
        );
    }

    #[test]
    fn gpu_less_machine() {
        let opts = DisplayOptions {
            gpu_name: None,
            ..opts()
        };
        let panel = render_panel(&bare_snapshot(), &opts);
        assert!(panel.lines().any(|l| l == "GPU     N/A  No GPU"));
        assert!(panel.lines().any(|l| l == "NET     ↓--  ↑-- KB/s"));
    }

    #[test]
    fn gpu_read_failure_keeps_name() {
        let panel = render_panel(&bare_snapshot(), &opts());
        assert!(panel.lines().any(|l| l == "GPU      --  Fake RTX"));
    }

    #[test]
    fn hot_cards_carry_band() {
        let mut snap = full_snapshot();
        snap.cpu_percent = 95.0;
        snap.ram_used_bytes = 13 << 30; // 81.25%
        let panel = render_panel(&snap, &opts());
        let lines: Vec<&str> = panel.lines().collect();
        assert!(lines[0].ends_with("[critical]"));
        assert!(lines[1].ends_with("[warning]"));
        assert!(!lines[2].contains('['));
    }
}
