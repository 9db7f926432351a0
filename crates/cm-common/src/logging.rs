use std::panic;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

/// Logging knobs shared by every binary in the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `CM_LOG_DIR`: write `<dir>/<app>.log` with daily rotation instead of stderr.
    pub log_dir: Option<PathBuf>,
    /// `CM_LOG_INCLUDE_BACKTRACE`: keep the default panic output as well.
    pub include_backtrace: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var_os("CM_LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            include_backtrace: std::env::var("CM_LOG_INCLUDE_BACKTRACE")
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Route panics through `tracing` with their location. Installed once per
/// process; later calls are no-ops.
pub fn install_tracing_panic_hook(app_name: &'static str, config: &LogConfig) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let include_backtrace = config.include_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());

            tracing::error!(
                application = app_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &'static str, dir: &Path) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("failed to create CM_LOG_DIR {}: {err}; logging to stderr", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Install the global fmt subscriber. `RUST_LOG` filters (default `info`).
/// Output goes to stderr so command output on stdout stays machine readable.
pub fn init_tracing_subscriber(app_name: &'static str, config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let file_writer = config
        .log_dir
        .as_ref()
        .and_then(|dir| rotating_file_writer(app_name, dir));

    match file_writer {
        Some(writer) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
