//! The host environment as seen from inside the process.
//!
//! [`ProcessCommandLine`] implements the application's `HostEnvironment`
//! port on top of the process's own argument list, and
//! [`module_directory`] locates the directory the plugin binary was loaded
//! from (the "install directory").

use std::ffi::OsString;

use cpu_options_core::CommandLineSwitches;

use crate::application::configure_startup::HostEnvironment;

mod module_path;

pub use module_path::{module_directory, PathError};

/// Host switches parsed from an argument list.
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandLine {
    switches: CommandLineSwitches,
}

impl ProcessCommandLine {
    /// Parses an OS argument list.
    ///
    /// Arguments that are not valid Unicode cannot carry a switch this plugin
    /// understands and are converted lossily.
    pub fn from_os_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        Self::from_args(args)
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            switches: CommandLineSwitches::parse(args),
        }
    }

    pub fn switches(&self) -> &CommandLineSwitches {
        &self.switches
    }
}

impl HostEnvironment for ProcessCommandLine {
    fn switch_value(&self, name: &str) -> Option<String> {
        self.switches.value(name).map(str::to_string)
    }
}

/// Splits a launcher argument list at the first `--`.
///
/// Everything before the separator is the launcher's own command line (and
/// therefore the host switches); everything after it is the command to spawn.
/// Without a separator the whole list is the launcher's own.
pub fn split_child_command(args: &[OsString]) -> (&[OsString], &[OsString]) {
    match args.iter().position(|arg| arg == "--") {
        Some(idx) => (&args[..idx], &args[idx + 1..]),
        None => (args, &args[args.len()..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_switch_value_reads_parsed_switches() {
        let host = ProcessCommandLine::from_args(["SimCity 4.exe", "-CPUCount:2", "-w"]);
        assert_eq!(host.switch_value("CPUCount").as_deref(), Some("2"));
        assert_eq!(host.switch_value("w").as_deref(), Some(""));
        assert_eq!(host.switch_value("CPUPriority"), None);
    }

    #[test]
    fn test_from_os_args_matches_from_args() {
        let os = ProcessCommandLine::from_os_args(vec![
            OsString::from("game"),
            OsString::from("-CPUPriority:High"),
        ]);
        assert_eq!(os.switch_value("cpupriority").as_deref(), Some("High"));
        assert_eq!(os.switches().len(), 1);
    }

    #[test]
    fn test_split_child_command_at_first_separator() {
        // Arrange
        let args = os(&["cpu-options", "-CPUPriority:High", "--", "game", "--", "-w"]);

        // Act
        let (own, child) = split_child_command(&args);

        // Assert
        assert_eq!(own, &os(&["cpu-options", "-CPUPriority:High"])[..]);
        assert_eq!(child, &os(&["game", "--", "-w"])[..]);
    }

    #[test]
    fn test_split_child_command_without_separator() {
        let args = os(&["cpu-options", "-CPUCount:2"]);
        let (own, child) = split_child_command(&args);
        assert_eq!(own.len(), 2);
        assert!(child.is_empty());
    }
}
