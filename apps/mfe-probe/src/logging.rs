//! Console and rotating-file logging for the probe.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use file_rotate::{
    ContentLimit, FileRotate,
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
};
use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{Layer, fmt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, Section};

/// Noisy crates that should be filtered to WARN level to avoid debug spam
const NOISY_CRATES: &[&str] = &["hyper_util", "reqwest", "h2"];

const DEFAULT_MAX_SIZE_MB: u64 = 50;
const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Keeps the non-blocking console writer alive; drop it last to flush.
pub struct LoggingGuard {
    _console: WorkerGuard,
}

// ================= rotating writer =================

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(Arc::clone(&self.0))
    }
}

struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().flush()
    }
}

fn create_rotating_writer(section: &Section, base_dir: &Path) -> anyhow::Result<Option<RotWriter>> {
    let Some(file) = section.file() else {
        return Ok(None);
    };

    let p = Path::new(file);
    let log_path = if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    };
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let limit = match section.max_backups {
        Some(n) => FileLimit::MaxFiles(n),
        None => FileLimit::Age(
            chrono::Duration::try_days(DEFAULT_RETENTION_DAYS)
                .context("Invalid log retention period")?,
        ),
    };
    let max_bytes = section
        .max_size_mb
        .unwrap_or(DEFAULT_MAX_SIZE_MB)
        .saturating_mul(1024 * 1024);
    let max_bytes = usize::try_from(max_bytes).unwrap_or(usize::MAX);

    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    );
    Ok(Some(RotWriter(Arc::new(Mutex::new(rot)))))
}

// ================= targets =================

fn crate_sections(cfg: &LoggingConfig) -> Vec<(&str, &Section)> {
    let mut sections: Vec<(&str, &Section)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    sections.sort_unstable_by_key(|(k, _)| *k);
    sections
}

fn build_console_targets(cfg: &LoggingConfig) -> Targets {
    let default_level = cfg
        .get("default")
        .map_or(LevelFilter::INFO, |s| LevelFilter::from(s.console_level));

    let mut targets = Targets::new().with_default(default_level);
    for crate_name in NOISY_CRATES {
        targets = targets.with_target(*crate_name, LevelFilter::WARN);
    }
    for (crate_name, section) in crate_sections(cfg) {
        targets = targets.with_target(crate_name, LevelFilter::from(section.console_level));
    }
    targets
}

fn build_file_targets(cfg: &LoggingConfig) -> Targets {
    let default_level = cfg
        .get("default")
        .map_or(LevelFilter::OFF, |s| LevelFilter::from(s.file_level));

    let mut targets = Targets::new().with_default(default_level);
    for crate_name in NOISY_CRATES {
        targets = targets.with_target(*crate_name, LevelFilter::WARN);
    }
    for (crate_name, section) in crate_sections(cfg) {
        targets = targets.with_target(crate_name, LevelFilter::from(section.file_level));
    }
    targets
}

// ================= ANSI color support =================

/// Returns `true` if stderr supports ANSI color escape codes.
/// On Windows, also attempts to enable virtual-terminal color processing.
fn stderr_supports_ansi() -> bool {
    _ = enable_ansi_support::enable_ansi_support();
    supports_color::on(supports_color::Stream::Stderr).is_some_and(|level| level.has_basic)
}

// ================= init =================

/// Install the global subscriber: human console on stderr plus, when the
/// `default` section names a file, JSON records to a rotating log file.
///
/// `RUST_LOG` caps both sinks when set. Failing to open the log file
/// degrades to console-only logging.
#[must_use]
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) -> LoggingGuard {
    use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("LogTracer init skipped: {e}");
    }

    let file_writer = match cfg.get("default") {
        Some(section) => create_rotating_writer(section, base_dir).unwrap_or_else(|e| {
            eprintln!("Failed to initialize log file: {e:#}");
            None
        }),
        None => None,
    };

    let env: Option<EnvFilter> = EnvFilter::try_from_default_env().ok();

    let (nb_stderr, guard) = tracing_appender::non_blocking(io::stderr());
    let console_layer = fmt::layer()
        .with_writer(nb_stderr)
        .with_ansi(stderr_supports_ansi())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(build_console_targets(cfg));

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer)
            .with_filter(build_file_targets(cfg))
    });

    let subscriber = Registry::default()
        .with(env)
        .with(console_layer)
        .with(file_layer);
    _ = subscriber.try_init();

    LoggingGuard { _console: guard }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tracing::Level;

    fn section(console: Option<Level>, file: Option<&str>) -> Section {
        Section {
            console_level: console,
            file: file.map(str::to_owned),
            file_level: Some(Level::DEBUG),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn console_targets_follow_sections() {
        let mut cfg = default_logging_config();
        cfg.insert("mfe_shell".to_owned(), section(Some(Level::TRACE), None));
        cfg.insert("mfe_probe".to_owned(), section(None, None));

        let targets = build_console_targets(&cfg);

        assert!(targets.would_enable("mfe_shell::domain::orchestrator", &Level::TRACE));
        assert!(!targets.would_enable("mfe_probe::report", &Level::ERROR));
        assert!(targets.would_enable("other", &Level::INFO));
        assert!(!targets.would_enable("other", &Level::DEBUG));
        assert!(!targets.would_enable("reqwest::connect", &Level::INFO));
    }

    #[test]
    fn file_sink_is_off_without_default_section() {
        let cfg = LoggingConfig::new();
        let targets = build_file_targets(&cfg);
        assert!(!targets.would_enable("mfe_shell", &Level::ERROR));
    }

    #[test]
    fn rotating_writer_resolves_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = create_rotating_writer(&section(None, Some("logs/probe.log")), tmp.path())
            .unwrap()
            .unwrap();

        let mut handle = fmt::MakeWriter::make_writer(&writer);
        handle.write_all(b"{\"msg\":\"hello\"}\n").unwrap();
        handle.flush().unwrap();

        let written = std::fs::read_to_string(tmp.path().join("logs/probe.log")).unwrap();
        assert!(written.contains("hello"));
    }

    #[test]
    fn no_file_means_no_writer() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(
            create_rotating_writer(&section(None, None), tmp.path())
                .unwrap()
                .is_none()
        );
    }
}
