//! # apm_mapper_cli
//!
//! Part of the apm_mapper crate family.
//!
//! This is the command line application which maps atom probe metadata onto NXapm
//! templates.
//!
//! ## Use
//!
//! Make a template configuration, fill it out, then run the batch:
//!
//! ```bash
//! apm_mapper_cli new --path config.yaml
//! apm_mapper_cli --path config.yaml
//! ```
//!
//! Pass `--verbose` (or set `verbose: true` in the configuration) to log every key read
//! from the input files.
use clap::{Arg, ArgAction, Command};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libapm_mapper::config::Config;
use libapm_mapper::process::process;

const LOG_FILE: &str = "./apm_mapper.log";

fn make_template_config(path: &Path) {
    match Config::default().write_config_file(path) {
        Ok(()) => spdlog::info!("Done."),
        Err(e) => spdlog::error!("Could not create template config file: {e}"),
    }
}

/// Log to the terminal and to a log file which is truncated on every run.
///
/// Returns a second logger writing to the log file only, used while the progress bar
/// owns the terminal.
fn setup_logging() -> Result<Arc<spdlog::Logger>, spdlog::Error> {
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from(LOG_FILE))
            .formatter(Box::new(spdlog::formatter::PatternFormatter::new(
                spdlog::formatter::pattern!(
                    "[{date_short} {time_short}] - [thread: {tid}] - [{^{level}}] - {payload}{eol}"
                ),
            )))
            .truncate(true)
            .build()?,
    );
    let file_logger = Arc::new(
        spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(file_sink.clone())
            .build()?,
    );
    let logger = spdlog::default_logger().fork_with(|new| {
        new.sinks_mut().push(file_sink);
        new.set_flush_level_filter(spdlog::LevelFilter::All);
        Ok(())
    })?;
    spdlog::set_default_logger(logger);
    Ok(file_logger)
}

fn main() {
    // Create a cli
    let matches = Command::new("apm_mapper_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every key read from the input files"),
        )
        .get_matches();

    let file_logger = match setup_logging() {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("Could not create log file {LOG_FILE}: {e}");
            None
        }
    };

    // Parse the cli
    let Some(config_path) = matches.get_one::<String>("path").map(PathBuf::from) else {
        spdlog::error!("A configuration path is required");
        return;
    };

    if let Some(("new", _)) = matches.subcommand() {
        spdlog::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    spdlog::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            spdlog::error!("{e}");
            return;
        }
    };
    if let Err(e) = config.validate() {
        spdlog::error!("{e}");
        return;
    }
    spdlog::info!("Config successfully loaded.");
    spdlog::info!("Output Path: {}", config.output_path.to_string_lossy());
    spdlog::info!("Number of Entries: {}", config.entries.len());

    if matches.get_flag("verbose") || config.verbose {
        let debug = spdlog::LevelFilter::MoreSevereEqual(spdlog::Level::Debug);
        spdlog::default_logger().set_level_filter(debug);
        if let Some(logger) = &file_logger {
            logger.set_level_filter(debug);
        }
    }

    // Setup the progress bar
    let pb = ProgressBar::new(config.entries.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    // Terminal output would tear the bar, so only the log file is written until the
    // batch is done
    let terminal_logger = spdlog::default_logger();
    if let Some(logger) = file_logger {
        spdlog::info!("Logging to {LOG_FILE} while mapping...");
        spdlog::set_default_logger(logger);
    }
    let (tx, rx) = std::sync::mpsc::channel();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, tx));

    // The channel closes once the task is done with its sender
    for status in rx {
        if status.is_finished() {
            pb.inc(1);
        } else {
            pb.set_message(format!("entry {}", status.entry_id));
        }
    }

    let joined = handle.join();
    pb.finish();
    spdlog::set_default_logger(terminal_logger);

    match joined {
        Ok(result) => match result {
            Ok(_) => spdlog::info!("Successfully mapped all entries!"),
            Err(e) => spdlog::error!("Mapping failed with error: {e}"),
        },
        Err(_) => spdlog::error!("Failed to join mapping task!"),
    }

    spdlog::info!("Done.");
}
