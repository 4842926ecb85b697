// src/exec/mod.rs

//! Process execution and task tracking.
//!
//! - [`process`] spawns a shell command and exposes its merged output as a
//!   pull-based line stream plus a kill request channel.
//! - [`pump`] drains that stream in time slices and enforces the emission cap.
//! - [`registry`] is the shared table of live tasks keyed by process id.
//! - [`runner`] ties them together for one operator command, and serves
//!   `kill` and `cd`.
//! - [`policy`] validates command strings before anything is spawned.
//! - [`workdir`] holds the relay-wide working directory.

pub mod policy;
pub mod process;
pub mod pump;
pub mod registry;
pub mod runner;
pub mod workdir;

pub use policy::{CommandOrigin, CommandPolicy, ValidatedCommand};
pub use process::{KillHandle, LineSource, ProcessHandle};
pub use pump::{OutputPump, PumpReport, PumpSettings};
pub use registry::{RegistrySnapshot, Task, TaskRegistry};
pub use runner::{CommandRunner, ExecOptions, RunReport};
pub use workdir::WorkingDirectory;
