//! devloop CLI - development-loop supervisor
//!
//! Usage: devloop [--config <path>] [--json]
//!
//! Watches the configured working tree and dependency trees, then restarts
//! the configured server command whenever they change. Runs until Ctrl+C.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use devloop::config::Config;
use devloop::supervisor::{supervise, SuperviseOptions, SupervisorEvent};

/// devloop - development-loop supervisor
#[derive(Parser, Debug)]
#[command(name = "devloop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "devloop.toml")]
    config: PathBuf,

    /// Output NDJSON events for CI
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cmd_run(&cli.config, cli.json)
}

fn cmd_run(config_path: &Path, json: bool) -> Result<()> {
    let (config, warnings) = Config::load_with_warnings(config_path)?;

    if !json {
        for warning in &warnings {
            let location = match warning.line {
                Some(line) => format!("{}:{}", warning.file.display(), line),
                None => warning.file.display().to_string(),
            };
            match &warning.suggestion {
                Some(suggestion) => eprintln!(
                    "⚠ Unknown config key '{}' in {} (did you mean '{}'?)",
                    warning.key, location, suggestion
                ),
                None => eprintln!("⚠ Unknown config key '{}' in {}", warning.key, location),
            }
        }
    }

    config.validate(config_path)?;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    if !json {
        println!("👀 devloop");
        println!("Root: {}", config.watch.root.display());
        for dependency in &config.watch.dependencies {
            println!("Dependency: {}", dependency.display());
        }
        println!("Press Ctrl+C to stop\n");
    }

    let options = SuperviseOptions::from_config(&config);

    supervise(options, running, move |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            render(&event);
        }
    })?;

    Ok(())
}

fn render(event: &SupervisorEvent) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            let h = secs / 3600;
            let m = (secs % 3600) / 60;
            let s = secs % 60;
            format!("{:02}:{:02}:{:02}", h, m, s)
        })
        .unwrap_or_else(|_| "00:00:00".to_string());

    match event {
        SupervisorEvent::SupervisorStarted { root, dependencies } => {
            println!(
                "[{timestamp}] 📂 Watching: {} (+{} dependency trees)",
                root, dependencies
            );
        }
        SupervisorEvent::Change {
            path,
            classification,
        } => {
            println!("[{timestamp}] 📝 Changed ({classification}): {path}");
        }
        SupervisorEvent::UpdateStarted => {
            println!("[{timestamp}] 🔄 Updating dependencies...");
        }
        SupervisorEvent::UpdateComplete { success: true } => {
            println!("[{timestamp}] ✓ Dependencies updated");
        }
        SupervisorEvent::UpdateComplete { success: false } => {
            println!("[{timestamp}] ⚠ Dependency update failed, restarting anyway");
        }
        SupervisorEvent::ServerStarted { pid } => {
            println!("[{timestamp}] 🚀 Server started (pid {pid})");
        }
        SupervisorEvent::Error { message } => {
            eprintln!("[{timestamp}] ✗ Error: {message}");
        }
        SupervisorEvent::Shutdown => {
            println!("\n👋 Shutting down...");
        }
    }
}
