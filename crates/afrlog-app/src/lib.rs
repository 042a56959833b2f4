//! AFR logger front end
//!
//! Connects a byte source to the recorder and drives it from stdin commands.
//! Logs go to stderr so `export` output on stdout stays clean.

pub mod commands;
pub mod source;

use std::path::PathBuf;

use afrlog_core::config::LoggerConfig;
use afrlog_core::recorder::SharedRecorder;
use afrlog_core::stream::pump;
use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::{Outcome, Session, HELP};
use source::Source;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "afrlog", version, about = "Record wideband AFR readings into takes")]
pub struct Args {
    /// Serial port the sensor is connected to
    #[arg(long)]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    pub baud: Option<u32>,

    /// Read raw sensor output from a file instead of a port
    #[arg(long, conflicts_with = "port")]
    pub input: Option<PathBuf>,

    /// Use the simulated sensor
    #[arg(long, conflicts_with_all = ["port", "input"])]
    pub demo: bool,

    /// Sampling period in milliseconds
    #[arg(long)]
    pub resolution_ms: Option<u64>,

    /// Config file (defaults to <config dir>/afrlog/config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List serial ports and exit
    #[arg(long)]
    pub list_ports: bool,
}

impl Args {
    /// Load the config file and apply command line overrides
    pub fn resolve_config(&self) -> anyhow::Result<LoggerConfig> {
        let mut config = match &self.config {
            Some(path) => LoggerConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => match LoggerConfig::default_path().filter(|p| p.exists()) {
                Some(path) => LoggerConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => LoggerConfig::default(),
            },
        };

        if let Some(port) = &self.port {
            config.port_name = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(resolution_ms) = self.resolution_ms {
            config.resolution_ms = resolution_ms;
        }
        config.validate()?;
        Ok(config)
    }

    /// Pick the byte source
    pub fn source(&self, config: &LoggerConfig) -> anyhow::Result<Source> {
        if self.demo {
            return Ok(Source::Demo);
        }
        if let Some(path) = &self.input {
            return Ok(Source::File(path.clone()));
        }
        if config.port_name.is_empty() {
            bail!("no byte source: pass --port, --input or --demo");
        }
        Ok(Source::Serial {
            port: config.port_name.clone(),
            baud_rate: config.baud_rate,
        })
    }
}

/// Run the logger until `quit` or end of stdin
pub async fn run(args: Args) -> anyhow::Result<()> {
    if args.list_ports {
        for port in source::list_ports()? {
            println!("{port}");
        }
        return Ok(());
    }

    let config = args.resolve_config()?;
    let source = args.source(&config)?;
    let recorder = SharedRecorder::new(config.recorder_config()?);

    let reader = source.open().await?;
    tracing::info!(%source, "connected");

    let mut sink = recorder.clone();
    let mut pump_task = tokio::spawn(async move { pump(reader, &mut sink).await });
    let mut pump_done = false;

    let mut session = Session::new(recorder.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    break;
                };
                if session.handle_line(&line, &mut stdout)? == Outcome::Quit {
                    break;
                }
            }
            result = &mut pump_task, if !pump_done => {
                pump_done = true;
                match result {
                    Ok(Ok(stats)) => tracing::info!(?stats, "byte source closed"),
                    Ok(Err(e)) => tracing::error!("byte source failed: {e}"),
                    Err(e) => tracing::error!("pump task failed: {e}"),
                }
            }
        }
    }

    recorder.stop();
    pump_task.abort();
    Ok(())
}
