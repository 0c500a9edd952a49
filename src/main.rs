//! Themesmith CLI - component theme build pipeline
//!
//! Usage: themesmith <COMMAND>
//!
//! Commands:
//!   build   Build all sections and snippets once
//!   watch   Build, then rebuild components as their sources change
//!   clean   Remove generated output files

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use themesmith::pipeline::BuildEvent;
use themesmith::watcher::WatchEvent;
use themesmith::{Config, ConfigWarning, ThemePaths};

/// Themesmith - component theme build pipeline
#[derive(Parser, Debug)]
#[command(name = "themesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build all sections and snippets once
    Build {
        /// Theme root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// Build, then watch component sources and rebuild on change
    Watch {
        /// Theme root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// Remove generated output files
    Clean {
        /// Theme root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { root } => cmd_build(&root, cli.json, cli.verbose),
        Commands::Watch { root } => cmd_watch(&root, cli.json),
        Commands::Clean { root } => cmd_clean(&root, cli.json, cli.verbose),
    }
}

fn load_config(root: &Path, json: bool) -> Result<Config> {
    let (config, warnings) = Config::load_or_default(root)?;
    report_config_warnings(&warnings, json);
    Ok(config)
}

fn report_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "config_warning",
                    "key": warning.key,
                    "file": warning.file.display().to_string()
                })
            );
        } else {
            eprintln!(
                "⚠ Unknown key '{}' in {}",
                warning.key,
                warning.file.display()
            );
        }
    }
}

fn print_build_event(event: &BuildEvent, json: bool, verbose: u8) {
    if json {
        println!("{}", event.to_json());
        return;
    }
    match event {
        BuildEvent::ComponentStarted { name, kind } => {
            let icon = match kind {
                themesmith::ComponentKind::Section => "🔨",
                themesmith::ComponentKind::Snippet => "🧩",
            };
            println!("{icon} Processing {kind}: {name}");
        }
        BuildEvent::ArtifactWritten { path } => {
            if verbose > 0 {
                println!("  ✓ {path}");
            }
        }
        BuildEvent::StyleError { component, message } => {
            eprintln!("✗ Stylesheet error in '{component}': {message}");
        }
        BuildEvent::WrapperCollision { wrapper, first, second } => {
            eprintln!("⚠ Wrapper name collision: '{wrapper}' is generated by both '{first}' and '{second}'");
        }
        BuildEvent::ComponentFailed { component, message } => {
            eprintln!("✗ Component '{component}' failed: {message}");
        }
    }
}

fn cmd_build(root: &Path, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(root, json)?;
    let paths = ThemePaths::resolve(root, &config);

    if !json {
        println!("🚀 Themesmith Build");
        println!("Theme: {}", root.display());
        println!();
    }

    let report = themesmith::build_all(&paths, &|event| print_build_event(&event, json, verbose))?;

    if json {
        let output = serde_json::json!({
            "event": "build",
            "status": if report.is_success() { "success" } else { "partial" },
            "written": report.written.len(),
            "skipped": report.skipped.len(),
            "errors": report.errors.len()
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Build Results:");
        println!("  ✓ Written: {} files", report.written.len());
        if !report.skipped.is_empty() {
            println!("  ⚠ Skipped: {} missing sources", report.skipped.len());
        }
        if !report.errors.is_empty() {
            println!("  ✗ Errors: {}", report.errors.len());
            for err in &report.errors {
                println!("    - {err}");
            }
        }
        println!("\n✨ Build completed");
    }

    Ok(())
}

fn cmd_watch(root: &Path, json: bool) -> Result<()> {
    let config = load_config(root, json)?;
    let paths = ThemePaths::resolve(root, &config);

    let options = themesmith::WatchOptions {
        paths,
        debounce: Duration::from_millis(config.watch.debounce_ms),
    };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("👀 Themesmith Watch");
        println!("Theme: {}", root.display());
        println!("Press Ctrl+C to stop\n");
    }

    themesmith::watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            match event {
                WatchEvent::Started { sections, snippets } => {
                    println!("📂 Watching: {sections}, {snippets}");
                }
                WatchEvent::InitialBuild { written, errors } => {
                    if errors > 0 {
                        println!("⚠ Initial build: {written} written, {errors} errors");
                    } else {
                        println!("✓ Initial build: {written} written");
                    }
                }
                WatchEvent::FileChanged { path } => {
                    println!("📝 Changed: {path}");
                }
                WatchEvent::RebuildStarted { component, kind } => {
                    println!("🔄 Rebuilding {kind}: {component}");
                }
                WatchEvent::RebuildComplete { component, written, errors } => {
                    if errors > 0 {
                        println!("⚠ {component}: {written} written, {errors} errors");
                    } else {
                        println!("✓ {component}: {written} written");
                    }
                }
                WatchEvent::Error { message } => {
                    eprintln!("✗ Error: {message}");
                }
                WatchEvent::Shutdown => {
                    println!("\n👋 Shutting down...");
                }
            }
        }
    })?;

    Ok(())
}

fn cmd_clean(root: &Path, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(root, json)?;
    let paths = ThemePaths::resolve(root, &config);

    let removed = themesmith::clean(&paths)?;

    if json {
        let output = serde_json::json!({
            "event": "clean",
            "removed": removed.len()
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        if verbose > 0 {
            for path in &removed {
                println!("  - {}", path.display());
            }
        }
        println!("🧹 Cleaned {} generated files", removed.len());
    }

    Ok(())
}
