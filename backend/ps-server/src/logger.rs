use crate::error::{Result as ServerErrorResult, ServerError};

use std::path::PathBuf;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, Record, info};

/// Initialize the global logger.
///
/// `log_file` = None logs to stdout; `colored` only applies to stdout.
pub fn initialize(
    level: LevelFilter,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let output = match log_file {
        Some(ref path) => {
            let file = fern::log_file(path).map_err(|e| ServerError::Io {
                path: path.clone(),
                source: e,
            })?;
            plain(Dispatch::new()).chain(file)
        }
        None if colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{} - {}] {} [{}]",
                        humantime::format_rfc3339(SystemTime::now()),
                        colors.color(record.level()),
                        message,
                        source_of(record)
                    ))
                })
                .chain(std::io::stdout())
        }
        None => plain(Dispatch::new()).chain(std::io::stdout()),
    };

    Dispatch::new()
        .level(level)
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(ref path) => info!("Logger initialized: level={}, file={}", level, path.display()),
        None => info!("Logger initialized: level={}, stdout", level),
    }

    // Bridge tracing events from dependencies into log
    tracing_log::LogTracer::init().ok();

    Ok(())
}

/// Uncolored format for files and non-TTY stdout
fn plain(dispatch: Dispatch) -> Dispatch {
    dispatch.format(|out, message, record| {
        out.finish(format_args!(
            "[{} - {}] {} [{}]",
            humantime::format_rfc3339(SystemTime::now()),
            record.level(),
            message,
            source_of(record)
        ))
    })
}

fn source_of(record: &Record) -> String {
    format!(
        "{}:{}",
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0)
    )
}
