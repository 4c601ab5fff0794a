use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Install a logger that appends one line per record to `path`.
/// The default level is `info`; `RUST_LOG` overrides it.
pub fn init_file_logger(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            writeln!(buf, "{}", format_line(&timestamp, record.level(), &record.args().to_string()))
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("a logger is already installed")
}

fn format_line(timestamp: &str, level: Level, message: &str) -> String {
    format!("{timestamp} [{}] {message}", level_label(level))
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("2024.01.31 08:15:00", Level::Warn, "Content size changed"),
            "2024.01.31 08:15:00 [WARNING] Content size changed"
        );
        assert_eq!(
            format_line("2024.01.31 08:15:00", Level::Info, "ok"),
            "2024.01.31 08:15:00 [INFO] ok"
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(stamp.len(), "2024.01.31 08:15:00".len());
        assert_eq!(&stamp[4..5], ".");
        assert_eq!(&stamp[10..11], " ");
    }
}
