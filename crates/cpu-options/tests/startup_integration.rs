//! Integration tests for the plugin startup sequence.
//!
//! These tests exercise the plugin end-to-end: `CpuOptionsPlugin` +
//! `StartupConfigurator` + the real settings file on disk + the in-memory log
//! sink, with `MockProcessControl` standing in for the OS.

use std::sync::Arc;

use cpu_options::application::configure_startup::{
    AffinityOutcome, PriorityOutcome, ProcessControl, StartupReport,
};
use cpu_options::infrastructure::host::ProcessCommandLine;
use cpu_options::infrastructure::logging::{log_file_header, LogContext, LoggingConfig, MemoryLog};
use cpu_options::infrastructure::process_control::mock::MockProcessControl;
use cpu_options::infrastructure::storage::{PluginPaths, CONFIG_FILE_NAME};
use cpu_options::{CpuOptionsPlugin, PluginDirector, DIRECTOR_ID};
use cpu_options_core::{AffinityMask, PriorityClass};
use tempfile::TempDir;

/// A plugin installed in a fresh temporary directory.
struct Fixture {
    dir: TempDir,
    process: Arc<MockProcessControl>,
    log: MemoryLog,
}

impl Fixture {
    fn new(process: MockProcessControl) -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir must be created"),
            process: Arc::new(process),
            log: MemoryLog::new(),
        }
    }

    fn write_settings(&self, text: &str) {
        std::fs::write(self.dir.path().join(CONFIG_FILE_NAME), text)
            .expect("settings file must be written");
    }

    fn plugin(&self) -> CpuOptionsPlugin {
        let log = LogContext::with_writer(self.log.clone(), &LoggingConfig::default());
        CpuOptionsPlugin::with_log(
            PluginPaths::in_dir(self.dir.path()),
            Arc::clone(&self.process) as Arc<dyn ProcessControl>,
            log,
        )
    }

    fn run(&self, args: &[&str]) -> StartupReport {
        self.plugin().run(&ProcessCommandLine::from_args(args))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_no_switches_with_above_normal_setting_pins_core_and_raises_priority() {
    // Arrange
    let fx = Fixture::new(MockProcessControl::with_system_mask(0b1010));
    fx.write_settings("[CPUOptions]\nPriority=AboveNormal\n");

    // Act
    let report = fx.run(&["game.exe"]);

    // Assert
    assert_eq!(report.affinity, AffinityOutcome::Restricted(AffinityMask(0b0010)));
    assert_eq!(report.priority, PriorityOutcome::Applied(PriorityClass::AboveNormal));
    assert_eq!(fx.process.affinity_calls(), vec![AffinityMask(0b0010)]);
    assert_eq!(fx.process.priority_calls(), vec![PriorityClass::AboveNormal]);

    let info = fx.log.lines_at("INFO");
    assert_eq!(info.len(), 2, "log was:\n{}", fx.log.contents());
    assert!(info[0].ends_with("Configured the game to use 1 CPU core."));
    assert!(info[1].ends_with("Set the game's CPU priority to AboveNormal."));
    assert!(fx.log.lines_at("ERROR").is_empty());
}

#[test]
fn test_cpu_count_switch_leaves_affinity_alone_and_logs_value() {
    // Arrange
    let fx = Fixture::new(MockProcessControl::with_system_mask(0xFF));
    fx.write_settings("[CPUOptions]\nPriority=Normal\n");

    // Act
    let report = fx.run(&["game.exe", "-CPUCount:2"]);

    // Assert
    assert_eq!(report.affinity, AffinityOutcome::SkippedByCommandLine("2".to_string()));
    assert!(fx.process.affinity_calls().is_empty());
    assert!(fx
        .log
        .contents()
        .contains("because the command line contains -CPUCount:2."));
}

#[test]
fn test_priority_switch_low_is_informational_no_op() {
    // Arrange
    let fx = Fixture::new(MockProcessControl::new());
    fx.write_settings("[CPUOptions]\nPriority=High\n");

    // Act
    let report = fx.run(&["game.exe", "-CPUPriority:Low"]);

    // Assert
    assert_eq!(report.priority, PriorityOutcome::AlreadyApplied);
    assert!(fx.process.priority_calls().is_empty());
    assert!(fx.log.lines_at("ERROR").is_empty());
    assert!(fx
        .log
        .lines_at("INFO")
        .iter()
        .any(|line| line.ends_with("The game set its CPU priority to Low.")));
}

#[test]
fn test_settings_low_applies_idle() {
    let fx = Fixture::new(MockProcessControl::new());
    fx.write_settings("[CPUOptions]\nPriority=Low\n");

    let report = fx.run(&["game.exe"]);

    assert_eq!(report.priority, PriorityOutcome::Applied(PriorityClass::Idle));
    assert_eq!(fx.process.priority_calls(), vec![PriorityClass::Idle]);
}

#[test]
fn test_unrecognized_value_logs_error_with_literal_value() {
    for args in [&["game.exe", "-CPUPriority:bogus"][..], &["game.exe"]] {
        // Arrange
        let fx = Fixture::new(MockProcessControl::new());
        fx.write_settings("[CPUOptions]\nPriority=bogus\n");

        // Act
        let report = fx.run(args);

        // Assert
        assert_eq!(report.priority, PriorityOutcome::Unrecognized);
        assert!(fx.process.priority_calls().is_empty());
        let errors = fx.log.lines_at("ERROR");
        assert_eq!(errors.len(), 1, "log was:\n{}", fx.log.contents());
        assert!(errors[0].ends_with("Unsupported CPU priority value: bogus"));
    }
}

#[test]
fn test_missing_settings_file_is_logged_and_changes_nothing() {
    // Arrange – no settings file written.
    let fx = Fixture::new(MockProcessControl::new());

    // Act
    let report = fx.run(&["game.exe"]);

    // Assert
    assert_eq!(report.priority, PriorityOutcome::NotConfigured);
    assert!(fx.process.priority_calls().is_empty());
    let errors = fx.log.lines_at("ERROR");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Error when setting the CPU priority: failed to open the settings file"));
}

#[test]
fn test_missing_priority_key_is_logged_and_changes_nothing() {
    let fx = Fixture::new(MockProcessControl::new());
    fx.write_settings("[CPUOptions]\n; Priority=High\n");

    let report = fx.run(&["game.exe"]);

    assert_eq!(report.priority, PriorityOutcome::NotConfigured);
    assert!(fx.process.priority_calls().is_empty());
    assert!(fx.log.contents().contains("no such setting: CPUOptions.Priority"));
}

#[test]
fn test_existing_sc4_settings_file_is_honoured() {
    // Arrange – the file name used by existing installs, spelled out.
    let fx = Fixture::new(MockProcessControl::new());
    std::fs::write(fx.dir.path().join("SC4CPUOptions.ini"), "[CPUOptions]\nPriority=High\n")
        .expect("settings file must be written");

    // Act
    let report = fx.run(&["game.exe"]);

    // Assert
    assert_eq!(report.priority, PriorityOutcome::Applied(PriorityClass::High));
    assert!(fx.log.lines_at("ERROR").is_empty(), "log was:\n{}", fx.log.contents());
}

#[test]
fn test_quoted_setting_is_rejected_verbatim() {
    let fx = Fixture::new(MockProcessControl::new());
    fx.write_settings("[CPUOptions]\nPriority=\"High\"\n");

    let report = fx.run(&["game.exe"]);

    assert_eq!(report.priority, PriorityOutcome::Unrecognized);
    assert!(fx.process.priority_calls().is_empty());
    let errors = fx.log.lines_at("ERROR");
    assert_eq!(errors.len(), 1, "log was:\n{}", fx.log.contents());
    assert!(errors[0].ends_with("Unsupported CPU priority value: \"High\""));
}

#[test]
fn test_repeated_priority_key_is_logged_and_changes_nothing() {
    // Arrange
    let fx = Fixture::new(MockProcessControl::new());
    fx.write_settings("[CPUOptions]\nPriority=High\nPriority=Idle\n");

    // Act
    let report = fx.run(&["game.exe"]);

    // Assert
    assert_eq!(report.priority, PriorityOutcome::NotConfigured);
    assert!(fx.process.priority_calls().is_empty());
    assert!(fx
        .log
        .contents()
        .contains("Error when setting the CPU priority: duplicate setting: CPUOptions.Priority"));
}

#[test]
fn test_os_failures_are_logged_and_startup_still_succeeds() {
    // Arrange
    let fx = Fixture::new(MockProcessControl {
        fail_affinity: true,
        fail_priority: true,
        ..MockProcessControl::new()
    });
    fx.write_settings("[CPUOptions]\nPriority=High\n");
    let plugin = fx.plugin();

    // Act
    let started = plugin.on_start(&ProcessCommandLine::from_args(["game.exe"]));

    // Assert
    assert!(started);
    let errors = fx.log.lines_at("ERROR");
    assert_eq!(errors.len(), 2, "log was:\n{}", fx.log.contents());
    assert!(errors[0].contains("An OS error occurred when configuring the game to use 1 CPU core"));
    assert!(errors[0].contains("mock failure"));
    assert!(errors[1].contains("An OS error occurred when setting the CPU priority"));
}

#[test]
fn test_plugin_reports_director_id_and_paths() {
    let fx = Fixture::new(MockProcessControl::new());
    let plugin = fx.plugin();

    assert_eq!(plugin.director_id(), DIRECTOR_ID);
    assert_eq!(DIRECTOR_ID, 0x0C14_8B57);
    let paths = plugin.paths().expect("explicit paths must be kept");
    assert_eq!(paths.config_file, fx.dir.path().join(CONFIG_FILE_NAME));
}

#[test]
fn test_with_paths_writes_log_file_with_header() {
    // Arrange
    let fx = Fixture::new(MockProcessControl::with_system_mask(0b100));
    fx.write_settings("[CPUOptions]\nPriority=BelowNormal\n");
    let paths = PluginPaths::in_dir(fx.dir.path());
    let plugin = CpuOptionsPlugin::with_paths(
        paths.clone(),
        Arc::clone(&fx.process) as Arc<dyn ProcessControl>,
        &LoggingConfig::default(),
    );

    // Act
    plugin.run(&ProcessCommandLine::from_args(["game.exe"]));
    drop(plugin);

    // Assert
    let text = std::fs::read_to_string(&paths.log_file).expect("log file must exist");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], log_file_header());
    assert!(lines[0].starts_with("SC4CPUOptions v"));
    assert_eq!(paths.log_file.file_name().expect("log file name"), "SC4CPUOptions.log");
    assert_eq!(lines.len(), 3, "log was:\n{text}");
    assert!(lines[1].contains(" INFO "));
    assert!(lines[2].ends_with("Set the game's CPU priority to BelowNormal."));
}
