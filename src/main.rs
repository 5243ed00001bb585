use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use waypoint::core::config::{self, CliOverrides};
use waypoint::core::style::{self, Style};
use waypoint::demo;
use waypoint::host::{HeadlessHost, HostEvent};
use waypoint::nav::{Navigator, Snapshot};

#[derive(Parser)]
#[command(name = "waypoint", about = "Screen navigation coordinator on a headless host")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level override (error, warn, info, debug, trace, off)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Run every transition without animation
    #[arg(long, global = true)]
    no_animation: bool,

    /// Simulated animation duration in milliseconds
    #[arg(long, global = true)]
    animation_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a navigation script and print the host transcript
    Run {
        /// TOML script; the built-in storefront tour when omitted
        script: Option<PathBuf>,

        /// Print the transcript and final stacks as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the transition styles and what they resolve to
    Styles,
}

#[derive(Serialize)]
struct Report {
    timeline: Vec<HostEvent>,
    snapshot: Snapshot,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_source) = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            log_level: args.log_level.clone(),
            no_animation: args.no_animation,
            animation_ms: args.animation_ms,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = resolved
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Debug);
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
    config_source.log(&file_config);

    info!("Waypoint starting up (animated={})", resolved.coordinator.animated);

    match args.command {
        Command::Styles => {
            print_styles();
            Ok(())
        }
        Command::Run { script, json } => {
            let script = match script {
                Some(path) => demo::load_script(&path)?,
                None => demo::parse_script(demo::DEFAULT_SCRIPT)?,
            };

            let host = HeadlessHost::new(resolved.animation_duration);
            let (navigator, handle) =
                Navigator::spawn(Arc::new(host.clone()), resolved.coordinator);

            let outcome = demo::run_script(&navigator, &script).await;
            let snapshot = navigator.snapshot().await.unwrap_or_default();
            drop(navigator);
            if let Err(e) = handle.await {
                error!("Coordinator stopped abnormally: {}", e);
            }

            let report = Report {
                timeline: host.timeline(),
                snapshot,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            outcome.map_err(Into::into)
        }
    }
}

fn print_report(report: &Report) {
    println!("{:>4} {:>7}  {:<9} command", "seq", "at_ms", "phase");
    for event in &report.timeline {
        println!(
            "{:>4} {:>7}  {:<9} {}",
            event.seq,
            event.at_ms,
            event.phase.to_string(),
            event.command
        );
    }

    println!();
    for (index, stack) in report.snapshot.tabs.iter().enumerate() {
        let marker = if index == report.snapshot.active_tab { "*" } else { " " };
        let path: Vec<String> = stack
            .iter()
            .map(|node| format!("{:?}:{}", node.kind, node.screen))
            .collect();
        println!("{marker} tab {index}: {}", path.join(" > "));
    }
}

fn print_styles() {
    for style in Style::ALL {
        match style::resolve(style) {
            Some(descriptor) => println!(
                "{:<14} present={:?} dismiss={:?} mode={:?}",
                style.label(),
                descriptor.present,
                descriptor.dismiss,
                descriptor.presentation_mode()
            ),
            None => println!("{:<14} host default", style.label()),
        }
    }
}
