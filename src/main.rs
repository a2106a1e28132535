//! # sysmon - Polling System Metrics Widget
//!
//! Samples CPU, RAM, GPU, network and disk counters on a fixed interval and
//! renders them as a status bar, a panel, tray tooltips or JSON lines.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use sysmon::app::App;
use sysmon::config::{clamp_interval, Config};
use sysmon::monitor::SensorSource;
use sysmon::ui::Layout;

/// sysmon - polling system metrics widget
#[derive(Parser, Debug)]
#[command(name = "sysmon", version, about = "CPU, RAM, GPU, network and disk at a glance")]
struct Cli {
    /// Sampling interval in seconds (0.5 - 60)
    #[arg(long, short = 'i', value_name = "SECS")]
    interval: Option<f64>,

    /// Output layout
    #[arg(long, short = 'l', value_enum)]
    layout: Option<Layout>,

    /// Show temperatures in Celsius
    #[arg(long, conflicts_with = "fahrenheit")]
    celsius: bool,

    /// Show temperatures in Fahrenheit
    #[arg(long)]
    fahrenheit: bool,

    /// Exit after this many snapshots
    #[arg(long, short = 'n', value_name = "N")]
    count: Option<u64>,

    /// Do not probe for a GPU
    #[arg(long)]
    no_gpu: bool,

    /// CPU temperature source
    #[arg(long, value_enum)]
    sensor: Option<SensorSource>,

    /// LibreHardwareMonitor data.json URL
    #[arg(long, value_name = "URL")]
    lhm_url: Option<String>,

    /// Enable Prometheus metrics endpoint on the given address (e.g. "0.0.0.0:9100")
    #[arg(long, value_name = "ADDR")]
    prometheus: Option<String>,

    /// Config file (default ~/.config/sysmon/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.add_filter_allow_str("sysmon");
    if let Err(e) = simplelog::TermLogger::init(
        match cli.verbose {
            0 => simplelog::LevelFilter::Warn,
            1 => simplelog::LevelFilter::Info,
            2 => simplelog::LevelFilter::Debug,
            3.. => simplelog::LevelFilter::Trace,
        },
        log_config.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Error: failed to initialize logging: {}", e);
        process::exit(1);
    }

    // Load and apply CLI overrides to config
    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(secs) = cli.interval {
        config.update_interval_secs = clamp_interval(secs);
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if cli.celsius {
        config.use_celsius = true;
    }
    if cli.fahrenheit {
        config.use_celsius = false;
    }
    if cli.no_gpu {
        config.gpu_enabled = false;
    }
    if let Some(source) = cli.sensor {
        config.sensors.source = source;
    }
    if let Some(url) = cli.lhm_url {
        config.sensors.lhm_url = url;
    }

    let mut app = App::new(&config, cli.prometheus.as_deref(), cli.count).await?;
    app.run().await
}
