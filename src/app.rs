//! Application struct and consumer loop.
//!
//! Owns the sampling driver and prints one rendering per snapshot until
//! Ctrl-C or the requested number of snapshots.

use std::future::Future;
use std::io::{self, Write};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::Config;
use crate::monitor::{Sampler, SamplerDriver};
use crate::ui::{self, DisplayOptions, Layout};

pub struct App {
    driver: Option<SamplerDriver>,
    layout: Layout,
    display: DisplayOptions,
    /// Stop after this many snapshots
    count: Option<u64>,
}

impl App {
    /// Start the sampling thread and, if asked, the Prometheus endpoint.
    pub async fn new(config: &Config, prometheus_addr: Option<&str>, count: Option<u64>) -> Result<Self> {
        let sampler_config = config.sampler_config();
        let interval = config.interval();

        // Sampler construction probes devices with blocking calls
        let driver = tokio::task::spawn_blocking(move || {
            SamplerDriver::spawn(interval, move || Sampler::new(&sampler_config))
        })
        .await
        .context("sampler start-up task failed")?
        .context("cannot start sampling")?;

        let caps = driver.capabilities();
        match &caps.gpu_name {
            Some(name) => info!("GPU: {}", name),
            None => info!("No GPU"),
        }
        if !caps.temperature_sensor {
            info!("No CPU temperature sensor");
        }

        let mut display = config.display_options();
        display.gpu_name = caps.gpu_name.clone();
        display.temperature_sensor = caps.temperature_sensor;

        // Prometheus metrics endpoint
        if let Some(addr) = prometheus_addr {
            if let Err(e) = crate::metrics::start_server(addr, driver.subscribe()) {
                warn!("{}", e);
            }
        }

        Ok(Self {
            driver: Some(driver),
            layout: config.layout,
            display,
            count,
        })
    }

    /// Run the consumer loop. Returns on Ctrl-C, after `count` snapshots, or
    /// when the sampling thread goes away.
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(tokio::signal::ctrl_c()).await?;
        Ok(())
    }

    /// The consumer loop, stopping when `stop` completes. The stop future is
    /// created once and polled across every iteration. Returns how many
    /// snapshots were printed.
    pub async fn run_until<F: Future>(&mut self, stop: F) -> Result<u64> {
        let Some(driver) = self.driver.as_ref() else {
            return Ok(0);
        };
        let mut rx = driver.subscribe();
        let mut printed: u64 = 0;
        tokio::pin!(stop);

        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("Interrupted");
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        warn!("Sampling thread stopped");
                        break;
                    }
                    let latest = rx.borrow_and_update().clone();
                    let Some(snap) = latest else { continue };

                    let text = ui::render(self.layout, &snap, &self.display);
                    let mut out = io::stdout().lock();
                    writeln!(out, "{}", text)?;
                    if matches!(self.layout, Layout::Panel | Layout::Tray) {
                        writeln!(out)?;
                    }
                    out.flush()?;

                    printed += 1;
                    if self.count.is_some_and(|n| printed >= n) {
                        break;
                    }
                }
            }
        }

        self.shutdown().await?;
        Ok(printed)
    }

    /// Stop the sampling thread off the async runtime; joining it blocks.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            tokio::task::spawn_blocking(move || driver.shutdown())
                .await
                .context("sampler shutdown task failed")?;
        }
        Ok(())
    }
}
