use std::path::PathBuf;
use clap::Parser;
use log::LevelFilter;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use crate::config::io::ConfigIO;
use crate::config::types::LogLevel;
use crate::console::session::run_session;
use crate::error::AppRunError;

pub mod config;
pub mod console;
pub mod device;
pub mod error;
pub mod node_id;

#[derive(Parser, Debug)]
#[command(version, about = "Mirror the connection state of a simulated remote device")]
pub struct Args {
    /// Path of the JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides the log level from the config file
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

pub fn init_logging(level: LevelFilter) {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Trace)
        .chain(std::io::stderr());

    if let Ok(log_file) = std::env::var("LOG_FILE") {
        dispatch = dispatch.chain(
            fern::log_file(log_file).expect("Failed to open LOG_FILE")
        );
    }

    dispatch.apply().expect("Failed to initialize logger");

    // the dispatch passes everything, the config may lower this later
    log::set_max_level(level);
}

pub async fn run(args: Args, cancel: CancellationToken) -> Result<(), AppRunError> {
    let config_io = ConfigIO::resolve(args.config)?;
    let config = config_io.read_or_default().await?;

    let level = args.log_level.unwrap_or(config.log_level);
    log::set_max_level(level.into());

    let input = BufReader::new(tokio::io::stdin());
    run_session(&config, input, tokio::io::stdout(), cancel).await
}
