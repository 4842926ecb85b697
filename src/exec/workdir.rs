// src/exec/workdir.rs

//! Relay-wide working directory.
//!
//! Every spawn reads it; only `cd` writes it. Concurrent `cd` and spawns are
//! last-writer-wins.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::errors::{RelayError, Result};
use crate::fs::FileSystem;

#[derive(Debug, Clone)]
pub struct WorkingDirectory {
    current: Arc<RwLock<PathBuf>>,
}

impl WorkingDirectory {
    pub fn new(initial: impl Into<PathBuf>) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Start from the directory this process was launched in.
    pub fn from_process() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn get(&self) -> PathBuf {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change to `target`, resolved against the current directory when
    /// relative. The directory is left unchanged on failure.
    pub fn change(&self, fs: &dyn FileSystem, target: &str) -> Result<PathBuf> {
        let target = target.trim();
        if target.is_empty() {
            return Err(RelayError::DirectoryNotFound(String::new()));
        }

        let candidate = self.get().join(target);
        if !fs.is_dir(&candidate) {
            return Err(RelayError::DirectoryNotFound(target.to_string()));
        }
        let resolved = fs
            .canonicalize(&candidate)
            .map_err(|_| RelayError::DirectoryNotFound(target.to_string()))?;

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = resolved.clone();
        info!(dir = %resolved.display(), "working directory changed");
        Ok(resolved)
    }
}
