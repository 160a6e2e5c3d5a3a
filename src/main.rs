//! mp3-merge: concatenate MP3 files without re-encoding.
//!
//! Progress lines and JSON reports go to stdout, logs and errors to stderr.

use mp3_merge::cli::{Cli, ConsoleObserver};
use mp3_merge::config::MergeConfig;
use mp3_merge::error::{ErrorCode, MergeError, Result};
use mp3_merge::logging::init_logging;
use mp3_merge::merge::{merge, MergeObserver, TracingObserver};
use mp3_merge::types::MergeReport;
use mp3_merge::Mp3Format;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = MergeConfig::from_env();
    if let Some(msg) = config.validate() {
        return Err(MergeError::new(ErrorCode::Validation, msg));
    }
    init_logging(config.log_filter.as_deref(), cli.verbose);

    let job = cli.to_job(&config)?;
    let format = Mp3Format::with_buffer_size(config.copy_buffer_size);

    let mut observer: Box<dyn MergeObserver> = if cli.shows_progress() {
        Box::new(ConsoleObserver::default())
    } else {
        Box::new(TracingObserver)
    };
    let report = merge(&job, &format, &config, observer.as_mut())?;

    if cli.json {
        println!("{}", report_json(&report)?);
    }
    Ok(())
}

fn report_json(report: &MergeReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| {
        MergeError::with_source(ErrorCode::Io, "Failed to serialize merge report", e)
    })
}
