// src/exec/process.rs

//! One spawned shell subprocess.
//!
//! A [`ProcessHandle`] owns the `tokio::process::Child`, a merged
//! stdout/stderr line stream and the receiving side of a kill request
//! channel. The matching [`KillHandle`] can be cloned into the task
//! registry; requesting a kill there is observed by whichever of
//! [`ProcessHandle::read_line`] / [`ProcessHandle::wait`] the owning
//! invocation is currently suspended in, and the owner then terminates and
//! reaps the process itself.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::errors::{RelayError, Result};
use crate::types::TaskId;

/// Capacity of the merged output channel, in lines.
const LINE_CHANNEL_CAPACITY: usize = 64;

/// Cloneable request-to-terminate handle for a running process.
#[derive(Debug, Clone)]
pub struct KillHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl KillHandle {
    /// A handle not yet attached to any process.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Ask the owning invocation to terminate the process.
    ///
    /// Idempotent; never fails, even if the process already exited.
    pub fn kill(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for KillHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull-based source of output lines.
///
/// `None` signals end of stream. Implemented by [`ProcessHandle`]; tests can
/// substitute a scripted source.
pub trait LineSource: Send {
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>>;
}

#[derive(Debug)]
pub struct ProcessHandle {
    id: TaskId,
    child: Child,
    lines: mpsc::Receiver<String>,
    kill: KillHandle,
    kill_rx: watch::Receiver<bool>,
    /// Set once a kill request has been acted upon.
    kill_observed: bool,
}

impl ProcessHandle {
    /// Launch `command` through the platform shell without blocking.
    ///
    /// `working_dir` defaults to the current directory of this process.
    pub fn spawn(command: &str, working_dir: Option<&Path>) -> Result<Self> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a kill also reaches the shell's children.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(RelayError::SpawnFailed)?;

        let pid = child.id().ok_or_else(|| {
            RelayError::SpawnFailed(std::io::Error::other(
                "process exited before its id could be read",
            ))
        })?;
        let id = TaskId::new(pid);

        let (line_tx, lines) = mpsc::channel::<String>(LINE_CHANNEL_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(id, "stdout", stdout, line_tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(id, "stderr", stderr, line_tx);
        }

        let kill = KillHandle::new();
        let kill_rx = kill.subscribe();

        debug!(pid = %id, cmd = %command, "spawned shell process");

        Ok(Self {
            id,
            child,
            lines,
            kill,
            kill_rx,
            kill_observed: false,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn kill_handle(&self) -> KillHandle {
        self.kill.clone()
    }

    /// Request termination; acted upon at the next `read_line` / `wait`.
    pub fn kill(&self) {
        self.kill.kill();
    }

    pub fn kill_requested(&self) -> bool {
        self.kill.is_requested()
    }

    /// Next line of combined stdout/stderr output, including its trailing
    /// newline (the final line may lack one). `None` once both streams are
    /// closed.
    ///
    /// Suspends only the calling task.
    pub async fn read_line(&mut self) -> Option<String> {
        loop {
            tokio::select! {
                line = self.lines.recv() => return line,
                changed = self.kill_rx.changed(), if !self.kill_observed => {
                    self.on_kill_signal(changed.is_ok());
                }
            }
        }
    }

    /// Read and drop everything left on the output stream. Returns the number
    /// of discarded lines.
    pub async fn discard_remaining(&mut self) -> usize {
        let mut discarded = 0;
        while let Some(line) = self.read_line().await {
            debug!(pid = %self.id, "discarded: {}", line.trim_end());
            discarded += 1;
        }
        discarded
    }

    /// Wait for the process to exit and release its resources.
    ///
    /// Consumes the handle, so it can only happen once.
    pub async fn wait(mut self) -> Result<ExitStatus> {
        loop {
            tokio::select! {
                status = self.child.wait() => return status.map_err(RelayError::from),
                changed = self.kill_rx.changed(), if !self.kill_observed => {
                    self.on_kill_signal(changed.is_ok());
                }
            }
        }
    }

    fn on_kill_signal(&mut self, channel_open: bool) {
        if !channel_open {
            self.kill_observed = true;
            return;
        }
        if *self.kill_rx.borrow_and_update() {
            self.terminate();
        }
    }

    fn terminate(&mut self) {
        self.kill_observed = true;

        #[cfg(unix)]
        if let Some(pid) = self.child.id() {
            use nix::sys::signal::{Signal, killpg};
            use nix::unistd::Pid;

            match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                Ok(()) => {
                    debug!(pid = %self.id, "sent SIGKILL to process group");
                    return;
                }
                Err(e) => {
                    debug!(pid = %self.id, error = %e, "killpg failed; falling back to direct kill");
                }
            }
        }

        if let Err(e) = self.child.start_kill() {
            debug!(pid = %self.id, error = %e, "kill requested for a process that already exited");
        }
    }
}

impl LineSource for ProcessHandle {
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        Box::pin(self.read_line())
    }
}

/// Forward one pipe into the merged line channel until EOF.
///
/// Bytes are decoded lossily so binary output cannot end the stream early.
fn spawn_line_reader<R>(id: TaskId, stream: &'static str, reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(pid = %id, stream, error = %e, "output read failed");
                    break;
                }
            }
        }

        debug!(pid = %id, stream, "output reader ended");
    });
}
