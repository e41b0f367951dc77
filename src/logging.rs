//! Log output for the CLI: console by default, or a rolling file written
//! through tracing-appender.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info";

/// How often the log file starts afresh, as accepted by `--log-rotation`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationPeriod {
    /// New file every minute; handy when watching a short session.
    Minutely,
    /// New file every hour.
    Hourly,
    /// New file every day.
    #[default]
    Daily,
    /// A single file that grows forever.
    Never,
}

impl std::str::FromStr for RotationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutely" | "minute" => Ok(RotationPeriod::Minutely),
            "hourly" | "hour" => Ok(RotationPeriod::Hourly),
            "daily" | "day" => Ok(RotationPeriod::Daily),
            "never" | "none" => Ok(RotationPeriod::Never),
            other => Err(format!(
                "unknown rotation '{other}' (expected minutely, hourly, daily or never)"
            )),
        }
    }
}

impl From<RotationPeriod> for Rotation {
    fn from(period: RotationPeriod) -> Self {
        match period {
            RotationPeriod::Minutely => Rotation::MINUTELY,
            RotationPeriod::Hourly => Rotation::HOURLY,
            RotationPeriod::Daily => Rotation::DAILY,
            RotationPeriod::Never => Rotation::NEVER,
        }
    }
}

/// Where a rolling log file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub dir: PathBuf,
    pub prefix: String,
    pub rotation: RotationPeriod,
    /// Files kept on disk, 0 keeps everything.
    pub max_files: usize,
}

impl LogFile {
    /// Splits `path` into directory and file prefix; a trailing `.log` is
    /// dropped since the appender adds it back.
    pub fn from_path(path: &Path, rotation: RotationPeriod) -> Self {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("flashlight");
        let prefix = name.strip_suffix(".log").unwrap_or(name).to_string();
        Self {
            dir,
            prefix,
            rotation,
            max_files: 7,
        }
    }
}

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_console() -> LogGuard {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    LogGuard { _guard: None }
}

/// Installs a subscriber writing plain-text lines to a rolling file.
///
/// Old files beyond `max_files` are removed by the appender each time it
/// rotates. The returned guard must be held until the program exits, or
/// buffered lines are lost.
pub fn init_file(file: &LogFile) -> std::io::Result<LogGuard> {
    let mut builder = RollingFileAppender::builder()
        .rotation(file.rotation.into())
        .filename_prefix(&file.prefix)
        .filename_suffix("log");
    if file.max_files > 0 {
        builder = builder.max_log_files(file.max_files);
    }
    let appender = builder.build(&file.dir).map_err(std::io::Error::other)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            Layer::default()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(LogGuard {
        _guard: Some(guard),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_parsing() {
        assert_eq!("Hourly".parse::<RotationPeriod>().unwrap(), RotationPeriod::Hourly);
        assert_eq!("none".parse::<RotationPeriod>().unwrap(), RotationPeriod::Never);
        assert_eq!("minute".parse::<RotationPeriod>().unwrap(), RotationPeriod::Minutely);
        assert!("weekly".parse::<RotationPeriod>().is_err());
        assert_eq!(Rotation::from(RotationPeriod::default()), Rotation::DAILY);
        assert_eq!(Rotation::from(RotationPeriod::Never), Rotation::NEVER);
    }

    #[test]
    fn test_log_file_from_path() {
        let file = LogFile::from_path(Path::new("/var/log/torch/flashlight.log"), RotationPeriod::Daily);
        assert_eq!(file.dir, PathBuf::from("/var/log/torch"));
        assert_eq!(file.prefix, "flashlight");

        let file = LogFile::from_path(Path::new("app"), RotationPeriod::Never);
        assert_eq!(file.dir, PathBuf::from("."));
        assert_eq!(file.prefix, "app");
        assert_eq!(file.rotation, RotationPeriod::Never);
    }
}
