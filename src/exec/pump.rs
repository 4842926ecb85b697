// src/exec/pump.rs

//! Time-sliced output draining.
//!
//! The pump turns a push-as-available line stream into a handful of bounded
//! messages: lines accumulate until the slice duration has elapsed (checked
//! as each line arrives), then the accumulator is truncated and sent as one
//! chunk. After more than `emission_cap` chunks the pump stops forwarding and
//! reports the run as detached, without waiting for the process.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::exec::process::LineSource;
use crate::sink::Sink;
use crate::types::OutputChunk;

#[derive(Debug, Clone, Copy)]
pub struct PumpSettings {
    pub slice: Duration,
    pub max_chunk_len: usize,
    /// `None` disables early detachment (emit-everything mode).
    pub emission_cap: Option<usize>,
}

/// Result of one drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpReport {
    /// Number of time-sliced chunks emitted.
    pub emissions: usize,
    /// True when the cap was exceeded before the stream ended.
    pub detached: bool,
    /// Output accumulated since the last chunk, if any is worth sending.
    pub trailing: Option<OutputChunk>,
}

#[derive(Debug, Clone)]
pub struct OutputPump {
    settings: PumpSettings,
}

impl OutputPump {
    pub fn new(settings: PumpSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PumpSettings {
        &self.settings
    }

    /// Consume `source`, emitting slices to `sink` in production order.
    pub async fn drain<L>(&self, source: &mut L, sink: &dyn Sink) -> PumpReport
    where
        L: LineSource + ?Sized,
    {
        let mut acc = String::new();
        let mut slice_start = Instant::now();
        let mut emissions = 0usize;

        while let Some(line) = source.next_line().await {
            acc.push_str(&line);

            if slice_start.elapsed() > self.settings.slice {
                let chunk = OutputChunk::new(std::mem::take(&mut acc), self.settings.max_chunk_len);
                sink.emit(chunk.into_string()).await;
                emissions += 1;
                slice_start = Instant::now();
            }

            if let Some(cap) = self.settings.emission_cap {
                if emissions > cap {
                    debug!(emissions, cap, "emission cap exceeded; detaching");
                    return PumpReport {
                        emissions,
                        detached: true,
                        trailing: self.trailing(acc),
                    };
                }
            }
        }

        PumpReport {
            emissions,
            detached: false,
            trailing: self.trailing(acc),
        }
    }

    fn trailing(&self, acc: String) -> Option<OutputChunk> {
        let chunk = OutputChunk::new(acc, self.settings.max_chunk_len);
        if chunk.is_blank() { None } else { Some(chunk) }
    }
}
