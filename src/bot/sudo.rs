// src/bot/sudo.rs

//! `/sudo_login`: prime the sudo credential cache.

use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{RelayError, Result};

/// Command name that does not exist; reaching it proves sudo accepted the
/// password.
const SUDO_PROBE: &str = "xxxvvv";

const SUDO_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `sudo -S` with `password` on stdin. Returns whether sudo accepted it.
pub async fn sudo_login(password: &str) -> Result<bool> {
    let mut child = Command::new("sudo")
        .args(["-S", "-p", "", SUDO_PROBE])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(RelayError::SpawnFailed)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(format!("{password}\n").as_bytes())
            .await
            .context("writing password to sudo")?;
        // stdin drops here; sudo reads EOF after one attempt.
    }

    let output = tokio::time::timeout(SUDO_TIMEOUT, child.wait_with_output())
        .await
        .context("sudo did not finish in time")?
        .context("waiting for sudo")?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    debug!(output = %text.trim_end(), "sudo probe finished");

    let accepted = text.contains(&format!("{SUDO_PROBE}: command not found"));
    info!(accepted, "sudo login attempted");
    Ok(accepted)
}
