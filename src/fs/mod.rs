// src/fs/mod.rs

//! Filesystem queries used by `cd` and the script catalog.
//!
//! Nothing here writes to disk. `cd` needs `is_dir` + `canonicalize`; the
//! script catalog walks the scripts root with `read_dir`.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Absolute form of `path` with symlinks and `..` resolved. Fails when
    /// the path does not exist.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Full paths of the entries directly below `dir`, in no particular
    /// order.
    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// `std::fs`-backed implementation.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("resolving directory {:?}", path))
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(dir)
            .with_context(|| format!("listing {:?}", dir))?
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("reading entry in {:?}", dir))
            })
            .collect()
    }
}
