//! Text presentation of snapshots: one adapter per layout.

mod bar;
mod json;
mod panel;
mod tray;

use serde::Deserialize;

use crate::models::SampleSnapshot;
use crate::units::TempUnit;

pub use bar::render_bar;
pub use json::render_json;
pub use panel::render_panel;
pub use tray::render_tray;

/// Output layout, one per widget style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single status line
    #[default]
    Bar,
    /// One card per metric
    Panel,
    /// One tooltip per tray icon
    Tray,
    /// One JSON object per tick
    Json,
}

/// What to show and how.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub unit: TempUnit,
    pub show_cpu: bool,
    pub show_ram: bool,
    pub show_gpu: bool,
    pub show_net: bool,
    pub show_disk: bool,
    pub show_labels: bool,
    /// Name of the probed GPU; None when the machine has none.
    pub gpu_name: Option<String>,
    /// A CPU temperature sensor was found at start-up.
    pub temperature_sensor: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            unit: TempUnit::default(),
            show_cpu: true,
            show_ram: true,
            show_gpu: true,
            show_net: true,
            show_disk: true,
            show_labels: true,
            gpu_name: None,
            temperature_sensor: false,
        }
    }
}

/// Render a snapshot in the given layout.
pub fn render(layout: Layout, snap: &SampleSnapshot, opts: &DisplayOptions) -> String {
    match layout {
        Layout::Bar => render_bar(snap, opts),
        Layout::Panel => render_panel(snap, opts),
        Layout::Tray => render_tray(snap, opts).join("\n"),
        Layout::Json => render_json(snap),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn dispatch_by_layout() {
        let snap = full_snapshot();
        let opts = DisplayOptions {
            gpu_name: Some("Fake RTX".into()),
            ..DisplayOptions::default()
        };
        assert!(render(Layout::Bar, &snap, &opts).starts_with("CPU:"));
        assert!(render(Layout::Json, &snap, &opts).starts_with('{'));
        assert_eq!(render(Layout::Tray, &snap, &opts).lines().count(), 5);
    }

    #[test]
    fn layout_parses_from_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            layout: Layout,
        }
        let w: Wrapper = toml::from_str("layout = \"json\"").unwrap();
        assert_eq!(w.layout, Layout::Json);
    }
}
