//! The plugin as the host sees it.
//!
//! [`CpuOptionsPlugin`] is built once, when the plugin is attached to the
//! process.  Construction resolves the install directory, opens the log
//! file, and picks the process-control backend for the compile target.  The
//! host later calls [`PluginDirector::on_start`], which runs the startup use
//! case with the log file as the active `tracing` sink.

use std::io;
use std::sync::Arc;

use tracing::{debug, error};

use crate::application::configure_startup::{
    HostEnvironment, PluginDirector, ProcessControl, StartupConfigurator, StartupReport,
    DIRECTOR_ID,
};
use crate::infrastructure::logging::{LogContext, LoggingConfig};
use crate::infrastructure::process_control::platform_process_control;
use crate::infrastructure::storage::{IniSettingsFile, PluginPaths};

/// The assembled plugin.
pub struct CpuOptionsPlugin {
    configurator: StartupConfigurator,
    log: LogContext,
    paths: Option<PluginPaths>,
}

impl CpuOptionsPlugin {
    /// Assembles the plugin for the directory the module was loaded from.
    ///
    /// Never fails.  If the install directory cannot be found, the settings
    /// file is looked up relative to the working directory and the log file
    /// is skipped; if the log file cannot be created, it is skipped too.
    pub fn attach(config: &LoggingConfig) -> Self {
        match PluginPaths::from_module() {
            Ok(paths) => Self::with_paths(paths, platform_process_control(), config),
            Err(e) => {
                let log = without_log_file(config);
                log.in_scope(|| error!("Could not locate the plugin directory: {e}"));
                let mut plugin =
                    Self::with_log(PluginPaths::in_dir("."), platform_process_control(), log);
                plugin.paths = None;
                plugin
            }
        }
    }

    /// Assembles the plugin for explicit paths and process backend.
    pub fn with_paths(
        paths: PluginPaths,
        process: Arc<dyn ProcessControl>,
        config: &LoggingConfig,
    ) -> Self {
        let log = match LogContext::open_file(&paths.log_file, config) {
            Ok(log) => log,
            Err(e) => {
                let log = without_log_file(config);
                log.in_scope(|| error!("{e}"));
                log
            }
        };
        Self::with_log(paths, process, log)
    }

    /// Assembles the plugin with a caller-provided logging context.
    pub fn with_log(paths: PluginPaths, process: Arc<dyn ProcessControl>, log: LogContext) -> Self {
        let settings = Arc::new(IniSettingsFile::new(&paths.config_file));
        log.in_scope(|| debug!("settings file: {}", settings.path().display()));
        Self {
            configurator: StartupConfigurator::new(process, settings),
            log,
            paths: Some(paths),
        }
    }

    /// Resolved install-directory paths, if the install directory was found.
    pub fn paths(&self) -> Option<&PluginPaths> {
        self.paths.as_ref()
    }

    pub fn log(&self) -> &LogContext {
        &self.log
    }

    /// Runs the startup sequence inside the plugin's logging context.
    pub fn run(&self, host: &dyn HostEnvironment) -> StartupReport {
        self.log.in_scope(|| self.configurator.run(host))
    }
}

impl PluginDirector for CpuOptionsPlugin {
    fn director_id(&self) -> u32 {
        DIRECTOR_ID
    }

    fn on_start(&self, host: &dyn HostEnvironment) -> bool {
        self.log.in_scope(|| self.configurator.on_start(host))
    }
}

/// Logging context used when the log file is unavailable: stderr only when
/// echoing is enabled, otherwise nothing.
fn without_log_file(config: &LoggingConfig) -> LogContext {
    if config.echo_to_stderr {
        LogContext::with_writer(io::sink, config)
    } else {
        LogContext::disabled()
    }
}
