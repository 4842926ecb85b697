// src/scripts.rs

//! Listing of runnable scripts for `/script` without arguments.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::fs::FileSystem;

pub trait ScriptCatalog: Send + Sync {
    /// Every file below `root`, as `/`-separated paths relative to it.
    fn list_scripts(&self, root: &Path) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct FsScriptCatalog {
    fs: Arc<dyn FileSystem>,
}

impl FsScriptCatalog {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ScriptCatalog for FsScriptCatalog {
    fn list_scripts(&self, root: &Path) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in self.fs.read_dir(&dir)? {
                if self.fs.is_dir(&entry) {
                    pending.push(entry);
                } else if self.fs.is_file(&entry) {
                    let rel = entry.strip_prefix(root).unwrap_or(&entry);
                    let parts: Vec<_> = rel
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    found.push(parts.join("/"));
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
