use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shell_relay::sink::Sink;

/// A sink that records every delivered message, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }

    /// Poll until a message containing `needle` arrives.
    pub async fn wait_for(&self, needle: &str) {
        for _ in 0..500 {
            if self.contains(needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no message containing {needle:?}; got {:?}", self.messages());
    }
}

impl Sink for RecordingSink {
    fn deliver(&self, text: String) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let messages = Arc::clone(&self.messages);
        Box::pin(async move {
            messages.lock().unwrap().push(text);
        })
    }
}
