//! CPU Options launcher entry point.
//!
//! Runs the plugin's startup sequence against this process and, optionally,
//! launches a game that inherits the result.  Both affinity and priority are
//! inherited by child processes on Windows and Linux, so
//!
//! ```text
//! cpu-options -CPUPriority:High -- "SimCity 4.exe" -w
//! ```
//!
//! starts the game pinned to one core at high priority without loading any
//! DLL into it.
//!
//! # Arguments
//!
//! Everything before `--` is treated as the host command line, so
//! `-CPUCount:<n>` and `-CPUPriority:<level>` work exactly as they do for the
//! in-process plugin.  `SC4CPUOptions.ini` and `SC4CPUOptions.log` live next to the
//! launcher executable.  Log events are also echoed to stderr; `RUST_LOG`
//! overrides the filter.

use std::ffi::OsString;
use std::process::Command;

use anyhow::Context;
use tracing::{debug, info};

use cpu_options::infrastructure::host::{split_child_command, ProcessCommandLine};
use cpu_options::infrastructure::logging::LoggingConfig;
use cpu_options::CpuOptionsPlugin;

fn main() -> anyhow::Result<()> {
    let args: Vec<OsString> = std::env::args_os().collect();
    let (own_args, child) = split_child_command(&args);

    let config = LoggingConfig {
        echo_to_stderr: true,
        ..LoggingConfig::from_env()
    };
    let plugin = CpuOptionsPlugin::attach(&config);
    let host = ProcessCommandLine::from_os_args(own_args.iter().cloned());

    let report = plugin.run(&host);
    plugin.log().in_scope(|| debug!("startup report: {report:?}"));

    let Some((program, rest)) = child.split_first() else {
        return Ok(());
    };

    plugin
        .log()
        .in_scope(|| info!("Launching {}", program.to_string_lossy()));
    let status = Command::new(program)
        .args(rest)
        .status()
        .with_context(|| format!("failed to launch {}", program.to_string_lossy()))?;

    std::process::exit(status.code().unwrap_or(1));
}
