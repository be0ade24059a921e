use logview::app::LogViewApp;
use logview::cli::Args;
use logview::paths::{self, PathConfig};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::{debug, info};

/// Console logging unless `--log` was given, in which case everything goes to
/// the file. Verbosity flags pick the level; RUST_LOG still applies on console.
fn init_logging(args: &Args, path_config: &PathConfig) -> anyhow::Result<()> {
    let log_level = args.log_level();

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| paths::data_file(paths::LOG_FILE_NAME, path_config));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .filter_module("ureq", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level.to_string().to_lowercase()),
        )
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("ureq", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = paths::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    init_logging(&args, &path_config)?;

    info!("logview starting...");
    debug!("Command-line args: {:?}", args);

    let source = args.feed_source();
    match &source {
        Some(source) => info!("Feed: {}", source),
        None => info!("No feed given, starting empty (use Open to pick a file)"),
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("logview v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1280.0, 800.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "logview",
        native_options,
        Box::new(move |cc| Ok(Box::new(LogViewApp::new(cc, source)))),
    )?;

    info!("Application exiting");
    Ok(())
}
