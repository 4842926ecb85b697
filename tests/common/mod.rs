#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use shell_relay::config::Settings;
use shell_relay::exec::{CommandPolicy, CommandRunner, ExecOptions, TaskRegistry, WorkingDirectory};
use shell_relay::fs::{FileSystem, RealFileSystem};

pub use shell_relay_test_utils::{init_tracing, with_timeout, RecordingSink, SettingsBuilder};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A runner over the real filesystem, starting in `cwd`.
pub fn runner_in(settings: &Settings, cwd: impl AsRef<Path>) -> CommandRunner {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    CommandRunner::new(
        TaskRegistry::new(),
        WorkingDirectory::new(cwd.as_ref()),
        fs,
        CommandPolicy::from_settings(settings),
        ExecOptions::from_settings(settings),
    )
}
