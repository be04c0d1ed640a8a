use chrono::{SecondsFormat, Utc};
use log::{info, LevelFilter};
use std::str::FromStr;

/// Installs the global logger. `level` accepts the usual `log` level names;
/// unknown values fall back to `info`.
pub fn setup_logging(level: &str) -> Result<(), fern::InitError> {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    info!("Logging initialized at {}.", level);
    Ok(())
}

/// Current UTC time as an ISO 8601 string with millisecond precision,
/// e.g. `2024-05-01T09:30:00.000Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
