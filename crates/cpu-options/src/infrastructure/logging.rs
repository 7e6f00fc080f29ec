//! The plugin's log file.
//!
//! The plugin writes a plain-text log next to itself.  The first line is a
//! header naming the plugin version; every following line is a timestamped,
//! severity-tagged `tracing` event:
//!
//! ```text
//! SC4CPUOptions v0.1.0
//! 2026-10-19T09:12:44.102331Z  INFO cpu_options::application::configure_startup: Configured the game to use 1 CPU core.
//! 2026-10-19T09:12:44.102570Z ERROR cpu_options::application::configure_startup: Unsupported CPU priority value: Turbo
//! ```
//!
//! # Filtering
//!
//! The default directive is `error,cpu_options=info`: other crates only reach
//! the file at error level, while the plugin's own startup decisions are
//! written at info level.  `RUST_LOG` replaces the directive when
//! [`LoggingConfig::from_env`] is used.
//!
//! # Why not a global subscriber?
//!
//! The plugin lives inside someone else's process, which may install its own
//! `tracing` subscriber.  A [`LogContext`] owns its own [`Dispatch`] and is
//! only active inside [`LogContext::in_scope`], so it never competes for the
//! global default.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Error type for log file setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be created or its header written.
    #[error("I/O error writing log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// First line of every log file.
pub fn log_file_header() -> String {
    format!("SC4CPUOptions v{}", env!("CARGO_PKG_VERSION"))
}

/// Filter directive used when nothing else is configured.
pub fn default_directives() -> String {
    format!("error,{}=info", env!("CARGO_CRATE_NAME"))
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub directives: String,
    /// Also write events to stderr (used by the launcher binary).
    pub echo_to_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directives: default_directives(),
            echo_to_stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Default config with the directive overridden by `RUST_LOG`, if set.
    pub fn from_env() -> Self {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_directives);
        Self {
            directives,
            ..Self::default()
        }
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// An explicitly constructed logging context.
///
/// Events emitted while [`LogContext::in_scope`] runs are routed to this
/// context's sink.
#[derive(Clone)]
pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    /// Creates (truncating) the log file at `path`, writes the header line and
    /// returns a context that appends events to it.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Io`] if the file cannot be created or written.
    pub fn open_file(path: &Path, config: &LoggingConfig) -> Result<Self, LoggingError> {
        let io_err = |source| LoggingError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(io_err)?;
        writeln!(file, "{}", log_file_header()).map_err(io_err)?;
        Ok(Self::with_writer(Mutex::new(file), config))
    }

    /// Builds a context that formats events into `writer`.
    pub fn with_writer<W>(writer: W, config: &LoggingConfig) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_new(&config.directives)
            .unwrap_or_else(|_| EnvFilter::new(default_directives()));
        let stderr = config
            .echo_to_stderr
            .then(|| fmt::layer().with_writer(io::stderr).with_target(false));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .with(stderr);

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A context that discards everything.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Runs `f` with this context as the current `tracing` dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

// ── In-memory sink ────────────────────────────────────────────────────────────

/// A cloneable in-memory log sink.
///
/// Every clone shares the same buffer, so a test can hand one clone to
/// [`LogContext::with_writer`] and read the result through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog(Arc<Mutex<Vec<u8>>>);

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }

    /// Written lines whose severity tag is `level` (e.g. `"INFO"`).
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let tag = format!(" {level} ");
        self.contents()
            .lines()
            .filter(|line| line.contains(&tag))
            .map(str::to_string)
            .collect()
    }
}

impl Write for MemoryLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryLog {
    type Writer = MemoryLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
