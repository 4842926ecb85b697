// tests/pump.rs
mod common;
use crate::common::{init_tracing, RecordingSink};

use std::time::Duration;

use shell_relay::exec::{OutputPump, PumpSettings};
use shell_relay_test_utils::ScriptedLines;

fn pump(slice_ms: u64, max_chunk_len: usize, emission_cap: Option<usize>) -> OutputPump {
    OutputPump::new(PumpSettings {
        slice: Duration::from_millis(slice_ms),
        max_chunk_len,
        emission_cap,
    })
}

#[tokio::test(start_paused = true)]
async fn lines_are_grouped_into_time_slices() {
    init_tracing();

    let mut source = ScriptedLines::new().repeated(10, Duration::from_millis(30), "line");
    let sink = RecordingSink::new();

    let report = pump(100, 4096, Some(3)).drain(&mut source, &sink).await;

    assert_eq!(
        sink.messages(),
        vec![
            "line 0\nline 1\nline 2\nline 3\n".to_string(),
            "line 4\nline 5\nline 6\nline 7\n".to_string(),
        ]
    );
    assert_eq!(report.emissions, 2);
    assert!(!report.detached);
    assert_eq!(
        report.trailing.map(|c| c.into_string()),
        Some("line 8\nline 9\n".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn fast_command_produces_only_trailing_output() {
    let mut source = ScriptedLines::new().line_after(Duration::from_millis(1), "hello\n");
    let sink = RecordingSink::new();

    let report = pump(1000, 4096, Some(3)).drain(&mut source, &sink).await;

    assert!(sink.messages().is_empty());
    assert_eq!(report.emissions, 0);
    assert_eq!(report.trailing.unwrap().as_str(), "hello\n");
}

#[tokio::test(start_paused = true)]
async fn exceeding_the_cap_detaches_without_consuming_the_rest() {
    init_tracing();

    let mut source = ScriptedLines::new().repeated(100, Duration::from_millis(60), "tick");
    let sink = RecordingSink::new();

    let report = pump(100, 4096, Some(3)).drain(&mut source, &sink).await;

    assert!(report.detached);
    assert_eq!(report.emissions, 4);
    assert_eq!(sink.messages().len(), 4);
    assert!(report.trailing.is_none());
    assert_eq!(source.consumed, 8);
    assert_eq!(source.remaining(), 92);
}

#[tokio::test(start_paused = true)]
async fn emit_everything_mode_never_detaches() {
    let mut source = ScriptedLines::new().repeated(100, Duration::from_millis(60), "tick");
    let sink = RecordingSink::new();

    let report = pump(100, 4096, None).drain(&mut source, &sink).await;

    assert!(!report.detached);
    assert_eq!(report.emissions, 50);
    assert_eq!(source.remaining(), 0);

    // Nothing dropped, nothing reordered.
    let delivered: String = sink.messages().concat();
    let expected: String = (0..100).map(|i| format!("tick {i}\n")).collect();
    assert_eq!(delivered, expected);
}

#[tokio::test(start_paused = true)]
async fn chunks_are_truncated_to_the_configured_length() {
    let mut source = ScriptedLines::new()
        .line_after(Duration::from_millis(50), "0123456789abcdef\n")
        .line_after(Duration::from_millis(100), "ghijklmnopqrstuv\n")
        .line_after(Duration::from_millis(10), "wxyz0123456789\n");
    let sink = RecordingSink::new();

    let report = pump(100, 10, Some(3)).drain(&mut source, &sink).await;

    assert_eq!(sink.messages(), vec!["0123456789".to_string()]);
    assert_eq!(report.trailing.unwrap().as_str(), "wxyz012345");
}

#[tokio::test(start_paused = true)]
async fn blank_output_is_never_sent_but_still_counts_as_a_slice() {
    let mut source = ScriptedLines::new()
        .line_after(Duration::from_millis(150), "   \n")
        .line_after(Duration::from_millis(10), "\n");
    let sink = RecordingSink::new();

    let report = pump(100, 4096, Some(3)).drain(&mut source, &sink).await;

    assert!(sink.messages().is_empty());
    assert_eq!(report.emissions, 1);
    assert!(report.trailing.is_none());
}
