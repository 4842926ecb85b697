// src/lib.rs

pub mod bot;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod scripts;
pub mod sink;
pub mod types;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::bot::{AllowList, Dispatcher, ShortcutMenu};
use crate::cli::CliArgs;
use crate::config::{Settings, load_and_validate};
use crate::exec::{CommandPolicy, CommandRunner, ExecOptions, TaskRegistry, WorkingDirectory};
use crate::fs::{FileSystem, RealFileSystem};
use crate::scripts::FsScriptCatalog;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the process-wide task registry and working directory
/// - command runner and dispatcher
/// - the console transport
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let settings = load_and_validate(&config_path)?;

    if args.check {
        print_settings(&settings);
        return Ok(());
    }

    let caller = args
        .user
        .or_else(|| settings.access.enabled_users.first().copied())
        .ok_or_else(|| anyhow!("no caller id: pass --user or list one in [access].enabled_users"))?;

    let dispatcher = build_dispatcher(&settings, WorkingDirectory::from_process()?);

    info!(config = %config_path.display(), "shell relay started");
    console::run_console(dispatcher, caller).await?;
    Ok(())
}

/// Assemble the dispatcher and everything it owns from validated settings.
pub fn build_dispatcher(settings: &Settings, cwd: WorkingDirectory) -> Dispatcher {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    build_dispatcher_with_fs(settings, cwd, fs)
}

/// Like [`build_dispatcher`], with an explicit filesystem for `cd` and the
/// script catalog.
pub fn build_dispatcher_with_fs(
    settings: &Settings,
    cwd: WorkingDirectory,
    fs: Arc<dyn FileSystem>,
) -> Dispatcher {
    let runner = CommandRunner::new(
        TaskRegistry::new(),
        cwd,
        Arc::clone(&fs),
        CommandPolicy::from_settings(settings),
        ExecOptions::from_settings(settings),
    );

    Dispatcher::new(
        runner,
        Arc::new(AllowList::new(settings.access.enabled_users.iter().copied())),
        Arc::new(FsScriptCatalog::new(fs)),
        ShortcutMenu::from_settings(settings),
        settings.menu.only_shortcuts,
    )
}

/// `--check` output: the effective settings.
fn print_settings(settings: &Settings) {
    println!("shell-relay settings");
    println!("  access.enabled_users = {:?}", settings.access.enabled_users);
    println!("  exec.scripts_root = {}", settings.exec.scripts_root.display());
    println!("  exec.max_output_len = {}", settings.exec.max_output_len);
    println!("  exec.slice = {:?}", settings.slice());
    println!("  exec.emission_cap = {}", settings.exec.emission_cap);
    println!("  exec.out_all_prefix = {:?}", settings.exec.out_all_prefix);
    if !settings.policy.white_list.is_empty() {
        println!("  policy.white_list = {:?}", settings.policy.white_list);
    }
    if !settings.policy.black_list.is_empty() {
        println!("  policy.black_list = {:?}", settings.policy.black_list);
    }
    if !settings.policy.black_chars.is_empty() {
        println!("  policy.black_chars = {:?}", settings.policy.black_chars);
    }
    println!("  menu.only_shortcuts = {}", settings.menu.only_shortcuts);
    println!();

    println!("shortcuts ({}):", settings.shortcut.len());
    for (key, sc) in settings.shortcut.iter() {
        println!("  - {key}");
        println!("      label: {}", sc.label);
        println!("      cmd: {}", sc.cmd);
        if sc.script {
            println!("      script: true");
        }
    }

    debug!("settings check complete");
}
