// src/exec/runner.rs

//! Per-invocation orchestration.
//!
//! `Validating -> Spawned -> Draining -> (EarlyDetached | Completed | Killed)
//! -> Deregistered`. Every successfully spawned command is registered, drained,
//! reaped exactly once and deregistered by the same invocation, whichever way
//! the drain ended.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::errors::{RelayError, Result};
use crate::exec::policy::{CommandOrigin, CommandPolicy, ValidatedCommand};
use crate::exec::process::ProcessHandle;
use crate::exec::pump::{OutputPump, PumpSettings};
use crate::exec::registry::{Task, TaskRegistry};
use crate::exec::workdir::WorkingDirectory;
use crate::fs::FileSystem;
use crate::sink::Sink;
use crate::types::{FinishState, OutputChunk, TaskId};

/// Limits and paths the runner applies to every invocation.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub scripts_root: PathBuf,
    pub max_output_len: usize,
    pub slice: Duration,
    pub emission_cap: usize,
}

impl ExecOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scripts_root: settings.exec.scripts_root.clone(),
            max_output_len: settings.exec.max_output_len,
            slice: settings.slice(),
            emission_cap: settings.exec.emission_cap,
        }
    }
}

/// What happened to one spawned command.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub id: TaskId,
    pub command: String,
    pub state: FinishState,
    pub emissions: usize,
    pub exit_code: Option<i32>,
    pub trailing: Option<OutputChunk>,
    /// Whether the run produced enough slices to warrant a completion notice.
    pub announce_finish: bool,
}

impl RunReport {
    /// Messages still owed to the operator once the run is over.
    pub fn into_messages(self) -> Vec<String> {
        let mut messages = Vec::new();
        if let Some(chunk) = self.trailing {
            messages.push(chunk.into_string());
        }
        if self.announce_finish {
            messages.push(format!("Task finished: {}", self.command));
        }
        messages
    }
}

#[derive(Debug, Clone)]
pub struct CommandRunner {
    registry: TaskRegistry,
    cwd: WorkingDirectory,
    fs: Arc<dyn FileSystem>,
    policy: Arc<CommandPolicy>,
    options: Arc<ExecOptions>,
}

impl CommandRunner {
    pub fn new(
        registry: TaskRegistry,
        cwd: WorkingDirectory,
        fs: Arc<dyn FileSystem>,
        policy: CommandPolicy,
        options: ExecOptions,
    ) -> Self {
        Self {
            registry,
            cwd,
            fs,
            policy: Arc::new(policy),
            options: Arc::new(options),
        }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn working_directory(&self) -> PathBuf {
        self.cwd.get()
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    pub fn validate(&self, raw: &str, origin: CommandOrigin) -> Result<ValidatedCommand> {
        self.policy.validate(raw, origin)
    }

    /// Validate, run and report one operator command. Every failure is
    /// turned into a message on `sink`.
    pub async fn execute(&self, raw: &str, origin: CommandOrigin, is_script: bool, sink: &dyn Sink) {
        debug!(cmd = %raw, ?origin, is_script, "exec command");

        let validated = match self.validate(raw, origin) {
            Ok(v) => v,
            Err(e) => {
                warn!(cmd = %raw, error = %e, "command rejected");
                self.notify(sink, e.to_string()).await;
                return;
            }
        };

        match self
            .run(&validated.command, is_script, validated.out_all, sink)
            .await
        {
            Ok(report) => {
                for message in report.into_messages() {
                    self.notify(sink, message).await;
                }
            }
            Err(e) => {
                warn!(cmd = %validated.command, error = %e, "command failed");
                self.notify(sink, e.to_string()).await;
            }
        }
    }

    /// Spawn `command`, stream its output to `sink` and reap it.
    ///
    /// Slices are emitted while the command runs. The early-detach notice is
    /// emitted as soon as the cap is hit; trailing output and the finish
    /// notice are returned in the report.
    pub async fn run(
        &self,
        command: &str,
        is_script: bool,
        out_all: bool,
        sink: &dyn Sink,
    ) -> Result<RunReport> {
        let command = self.resolve(command, is_script);
        let cwd = self.cwd.get();

        let mut handle = ProcessHandle::spawn(&command, Some(&cwd))?;
        let id = handle.id();

        if let Err(e) = self
            .registry
            .register(Task::new(id, command.clone(), handle.kill_handle()))
        {
            handle.kill();
            if let Err(wait_err) = handle.wait().await {
                error!(pid = %id, error = %wait_err, "failed to reap unregistered process");
            }
            return Err(e);
        }
        info!(pid = %id, cmd = %command, "task started");

        let pump = OutputPump::new(self.pump_settings(out_all));
        let drained = pump.drain(&mut handle, sink).await;

        if drained.detached {
            self.notify(sink, format!("Command not finished, kill with /kill {id}"))
                .await;
            let discarded = handle.discard_remaining().await;
            debug!(pid = %id, discarded, "detached drain reached end of output");
        }

        let killed = handle.kill_requested();
        let exit_code = match handle.wait().await {
            Ok(status) => status.code(),
            Err(e) => {
                warn!(pid = %id, error = %e, "waiting for process failed");
                None
            }
        };
        self.registry.deregister(id);

        let state = if killed {
            FinishState::Killed
        } else if drained.detached {
            FinishState::EarlyDetached
        } else {
            FinishState::Completed
        };

        info!(
            pid = %id,
            cmd = %command,
            ?state,
            emissions = drained.emissions,
            exit_code,
            "task finished"
        );

        Ok(RunReport {
            id,
            command,
            state,
            emissions: drained.emissions,
            exit_code,
            trailing: drained.trailing,
            announce_finish: drained.emissions > self.options.emission_cap,
        })
    }

    /// Request termination of a live task. Returns its command line.
    ///
    /// Deregistration is left to the invocation that owns the process.
    pub fn kill(&self, id: &str) -> Result<String> {
        let task = id
            .parse::<TaskId>()
            .ok()
            .and_then(|tid| self.registry.lookup(tid))
            .ok_or_else(|| RelayError::TaskNotFound(id.to_string()))?;

        info!(pid = %task.id, cmd = %task.command, "kill requested");
        task.kill();
        Ok(task.command)
    }

    pub fn change_directory(&self, path: &str) -> Result<PathBuf> {
        self.cwd.change(self.fs.as_ref(), path)
    }

    /// Send a status notice, cut to the per-message limit.
    async fn notify(&self, sink: &dyn Sink, text: String) {
        let chunk = OutputChunk::new(text, self.options.max_output_len);
        sink.emit(chunk.into_string()).await;
    }

    fn resolve(&self, command: &str, is_script: bool) -> String {
        if !is_script {
            return command.to_string();
        }
        join_script(&self.options.scripts_root, command)
    }

    fn pump_settings(&self, out_all: bool) -> PumpSettings {
        PumpSettings {
            slice: self.options.slice,
            max_chunk_len: self.options.max_output_len,
            emission_cap: if out_all {
                None
            } else {
                Some(self.options.emission_cap)
            },
        }
    }
}

/// `scripts_root/command`, where `command` may carry arguments.
fn join_script(root: &Path, command: &str) -> String {
    root.join(command.trim_start()).to_string_lossy().into_owned()
}
