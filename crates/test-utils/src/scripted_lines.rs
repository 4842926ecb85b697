use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use shell_relay::exec::LineSource;

/// A fake line source: each line becomes available after its delay.
///
/// Pair with `#[tokio::test(start_paused = true)]` so delays cost no real
/// time.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    script: VecDeque<(Duration, String)>,
    /// Number of lines handed out so far.
    pub consumed: usize,
}

impl ScriptedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_after(mut self, delay: Duration, line: &str) -> Self {
        self.script.push_back((delay, line.to_string()));
        self
    }

    /// `count` lines `"<prefix> <i>\n"`, one every `every`.
    pub fn repeated(mut self, count: usize, every: Duration, prefix: &str) -> Self {
        for i in 0..count {
            self.script.push_back((every, format!("{prefix} {i}\n")));
        }
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LineSource for ScriptedLines {
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        Box::pin(async move {
            let (delay, line) = self.script.pop_front()?;
            tokio::time::sleep(delay).await;
            self.consumed += 1;
            Some(line)
        })
    }
}
