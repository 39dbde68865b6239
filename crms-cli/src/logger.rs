//! Logging Infrastructure
//!
//! Console logging goes to stderr so it never interleaves with the menu on
//! stdout. With a log directory configured, logs are also written to daily
//! rotating `crms.YYYY-MM-DD` files, pruned after [`LOG_RETENTION_DAYS`].

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate, TimeZone};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// File name prefix of the rotating log files
pub const LOG_FILE_PREFIX: &str = "crms";

/// Days a rotated log file is kept
pub const LOG_RETENTION_DAYS: i64 = 14;

/// Logging settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl LogSettings {
    /// `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or(defaults.level),
            json: std::env::var("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.json),
            dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Delete rotated log files older than `days`
pub fn cleanup_old_logs(log_dir: &Path, days: i64) -> anyhow::Result<usize> {
    let cutoff = Local::now() - chrono::Duration::days(days);
    let prefix = format!("{LOG_FILE_PREFIX}.");
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date_part) = name.strip_prefix(&prefix) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        if let Some(midnight) = date.and_hms_opt(0, 0, 0)
            && let Some(local) = Local.from_local_datetime(&midnight).single()
            && local < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Initialize the logging system
pub fn init_logger(settings: &LogSettings) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if settings.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let Some(dir) = settings.dir.as_deref() else {
        subscriber.with(console_layer).init();
        return Ok(());
    };

    let log_dir = Path::new(dir);
    fs::create_dir_all(log_dir)?;
    if let Err(e) = cleanup_old_logs(log_dir, LOG_RETENTION_DAYS) {
        eprintln!("Failed to clean up old logs: {e}");
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let file_layer = if settings.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(appender))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(appender))
            .boxed()
    };

    subscriber.with(console_layer).with(file_layer).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_removes_only_old_rotated_files() {
        let dir = TempDir::new().unwrap();
        let old = (Local::now() - chrono::Duration::days(30)).format("%Y-%m-%d");
        let recent = Local::now().format("%Y-%m-%d");

        let old_file = dir.path().join(format!("crms.{old}"));
        let recent_file = dir.path().join(format!("crms.{recent}"));
        let other_file = dir.path().join(format!("notes.{old}"));
        for path in [&old_file, &recent_file, &other_file] {
            fs::write(path, "log").unwrap();
        }

        let removed = cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS).unwrap();

        assert_eq!(removed, 1);
        assert!(!old_file.exists());
        assert!(recent_file.exists());
        assert!(other_file.exists());
    }

    #[test]
    fn test_default_settings() {
        let settings = LogSettings::default();
        assert_eq!(settings.level, "warn");
        assert!(!settings.json);
        assert!(settings.dir.is_none());
    }
}
