// src/console.rs

//! Line-based console transport.
//!
//! Each stdin line is one message from the configured caller. A line of the
//! form `!<key>` presses the shortcut `<key>`. Every request runs in its own
//! Tokio task so `/tasks` and `/kill` stay responsive while commands drain.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::bot::{CallerId, Dispatcher, Incoming};
use crate::errors::Result;
use crate::sink::Sink;

/// Writes each message to stdout followed by a separator line.
#[derive(Debug)]
pub struct ConsoleSink {
    out: Mutex<tokio::io::Stdout>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn deliver(&self, text: String) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let mut out = self.out.lock().await;
            let mut framed = text;
            if !framed.ends_with('\n') {
                framed.push('\n');
            }
            framed.push_str("---\n");
            if let Err(e) = out.write_all(framed.as_bytes()).await {
                warn!(error = %e, "failed to write reply to stdout");
                return;
            }
            let _ = out.flush().await;
        })
    }
}

/// Turn one console line into a message, or `None` for blank lines.
pub fn parse_console_line(caller: CallerId, line: &str) -> Option<Incoming> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    match line.strip_prefix('!') {
        Some(key) => Some(Incoming::shortcut(caller, key.trim())),
        None => Some(Incoming::text(caller, line)),
    }
}

/// Serve stdin until EOF or Ctrl-C.
///
/// On EOF, requests still in flight are awaited; on Ctrl-C they are aborted
/// (their processes are killed on drop).
pub async fn run_console(dispatcher: Dispatcher, caller: CallerId) -> Result<()> {
    let sink: Arc<dyn Sink> = Arc::new(ConsoleSink::new());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    info!(caller, "console transport ready");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed; waiting for running commands");
                    while in_flight.join_next().await.is_some() {}
                    break;
                };
                let Some(incoming) = parse_console_line(caller, &line) else {
                    continue;
                };
                let dispatcher = dispatcher.clone();
                let sink = Arc::clone(&sink);
                in_flight.spawn(async move {
                    dispatcher.handle(incoming, sink.as_ref()).await;
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "request task failed");
                }
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                }
                info!("shutdown requested");
                in_flight.abort_all();
                break;
            }
        }
    }

    info!("console transport stopped");
    Ok(())
}
