// src/sink.rs

//! Operator-facing message sink.
//!
//! The messaging layer supplies a `Sink`; the command runner writes every
//! output chunk, trailing output and status notice through it. Chunks for a
//! single invocation are emitted in order by awaiting each `emit`.

use std::future::Future;
use std::pin::Pin;

pub trait Sink: Send + Sync {
    /// Hand a message to the transport.
    fn deliver(&self, text: String) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Send `text` unless it is empty or whitespace-only.
    fn emit(&self, text: String) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        if text.trim().is_empty() {
            return Box::pin(async {});
        }
        self.deliver(text)
    }
}
