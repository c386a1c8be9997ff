//! Server-sent-event decoder (lines -> JSON Value).

use crate::error::Error;
use crate::transport::{snippet, LineStream};
use crate::BoxStream;
use futures::{stream, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_DONE_SIGNAL: &str = "[DONE]";

/// Why a line produced no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty line or a `data:` marker with nothing after it (keep-alive).
    Blank,
    /// SSE comment (`:` prefix).
    Comment,
    /// Non-data SSE field such as `event:`, `id:` or `retry:`.
    Field,
    /// Payload that is not valid JSON, or JSON that is not an object.
    Malformed,
}

/// Outcome of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Payload(Value),
    Done,
    Skip(SkipReason),
}

/// Counters for one decoded stream. Shared with the consumer through an `Arc`
/// so skips stay observable while the stream is being polled.
#[derive(Debug, Default)]
pub struct DecodeStats {
    frames: AtomicU64,
    skipped_blank: AtomicU64,
    skipped_control: AtomicU64,
    skipped_malformed: AtomicU64,
}

impl DecodeStats {
    /// Payloads yielded so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn skipped_blank(&self) -> u64 {
        self.skipped_blank.load(Ordering::Relaxed)
    }

    /// Comment and non-data field lines.
    pub fn skipped_control(&self) -> u64 {
        self.skipped_control.load(Ordering::Relaxed)
    }

    /// Frames dropped because their payload was not valid JSON.
    pub fn skipped_malformed(&self) -> u64 {
        self.skipped_malformed.load(Ordering::Relaxed)
    }

    fn record(&self, frame: &Frame) {
        let counter = match frame {
            Frame::Payload(_) => &self.frames,
            Frame::Skip(SkipReason::Blank) => &self.skipped_blank,
            Frame::Skip(SkipReason::Comment) | Frame::Skip(SkipReason::Field) => {
                &self.skipped_control
            }
            Frame::Skip(SkipReason::Malformed) => &self.skipped_malformed,
            Frame::Done => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Line-oriented SSE decoder:
/// - strips `data:` / `data: `
/// - skips blank lines, comments and non-data fields
/// - stops on `done_signal` (default `[DONE]`), which is never emitted
/// - drops frames that fail to parse as JSON
#[derive(Debug, Clone)]
pub struct SseDecoder {
    done_signal: String,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            done_signal: DEFAULT_DONE_SIGNAL.to_string(),
        }
    }

    pub fn with_done_signal(done_signal: impl Into<String>) -> Self {
        Self {
            done_signal: done_signal.into(),
        }
    }

    pub fn done_signal(&self) -> &str {
        &self.done_signal
    }

    /// Classify a single line. Pure.
    pub fn decode_line(&self, line: &str) -> Frame {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Frame::Skip(SkipReason::Blank);
        }
        if trimmed.starts_with(':') {
            return Frame::Skip(SkipReason::Comment);
        }

        let payload = match trimmed.strip_prefix("data:") {
            Some(rest) => rest.trim(),
            None => {
                if is_sse_field(trimmed) {
                    return Frame::Skip(SkipReason::Field);
                }
                trimmed
            }
        };

        if payload.is_empty() {
            return Frame::Skip(SkipReason::Blank);
        }
        if payload == self.done_signal {
            return Frame::Done;
        }

        // Deltas are always objects; bare scalars and arrays carry no fields.
        match serde_json::from_str::<Value>(payload) {
            Ok(v) if v.is_object() => Frame::Payload(v),
            _ => Frame::Skip(SkipReason::Malformed),
        }
    }

    /// Decode a line source into a lazy sequence of JSON payloads.
    ///
    /// Read errors from the line source are passed through; the line source
    /// ends after its first error, so does this sequence.
    pub fn decode(&self, lines: LineStream) -> (BoxStream<'static, Value>, Arc<DecodeStats>) {
        let stats = Arc::new(DecodeStats::default());
        let decoder = self.clone();
        let state_stats = Arc::clone(&stats);

        let payloads = stream::unfold(
            (lines, decoder, state_stats),
            |(mut lines, decoder, stats)| async move {
                loop {
                    let line = match lines.next().await {
                        Some(Ok(line)) => line,
                        Some(Err(e)) => {
                            return Some((Err(Error::Request(e)), (lines, decoder, stats)));
                        }
                        None => {
                            log_summary(&stats);
                            return None;
                        }
                    };

                    let frame = decoder.decode_line(&line);
                    stats.record(&frame);
                    match frame {
                        Frame::Payload(v) => return Some((Ok(v), (lines, decoder, stats))),
                        Frame::Done => {
                            log_summary(&stats);
                            return None;
                        }
                        Frame::Skip(SkipReason::Malformed) => {
                            debug!(
                                frame = %snippet(line.trim(), 80),
                                "skipping malformed stream frame"
                            );
                        }
                        Frame::Skip(_) => {}
                    }
                }
            },
        );

        (Box::pin(payloads), stats)
    }
}

fn is_sse_field(line: &str) -> bool {
    ["event:", "id:", "retry:"]
        .iter()
        .any(|field| line.starts_with(field))
}

fn log_summary(stats: &DecodeStats) {
    debug!(
        frames = stats.frames(),
        skipped_blank = stats.skipped_blank(),
        skipped_control = stats.skipped_control(),
        skipped_malformed = stats.skipped_malformed(),
        "event stream finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{RequestError, RequestErrorKind};
    use serde_json::json;

    fn lines(items: &[&str]) -> LineStream {
        let owned: Vec<Result<String, RequestError>> =
            items.iter().map(|s| Ok(s.to_string())).collect();
        Box::pin(stream::iter(owned))
    }

    #[test]
    fn decode_line_classification() {
        let d = SseDecoder::new();
        assert_eq!(d.decode_line(""), Frame::Skip(SkipReason::Blank));
        assert_eq!(d.decode_line("   \t"), Frame::Skip(SkipReason::Blank));
        assert_eq!(d.decode_line("data:"), Frame::Skip(SkipReason::Blank));
        assert_eq!(d.decode_line(": ping"), Frame::Skip(SkipReason::Comment));
        assert_eq!(d.decode_line("event: message"), Frame::Skip(SkipReason::Field));
        assert_eq!(d.decode_line("retry: 3000"), Frame::Skip(SkipReason::Field));
        assert_eq!(d.decode_line("data: [DONE]"), Frame::Done);
        assert_eq!(d.decode_line("data:[DONE]"), Frame::Done);
        assert_eq!(d.decode_line("[DONE]"), Frame::Done);
        assert_eq!(d.decode_line("data: {oops"), Frame::Skip(SkipReason::Malformed));
        assert_eq!(d.decode_line("data:{\"a\":1}"), Frame::Payload(json!({"a": 1})));
        assert_eq!(d.decode_line("data: {\"a\":1}"), Frame::Payload(json!({"a": 1})));
        assert_eq!(d.decode_line("{\"bare\":true}"), Frame::Payload(json!({"bare": true})));
    }

    #[test]
    fn custom_done_signal() {
        let d = SseDecoder::with_done_signal("END");
        assert_eq!(d.decode_line("data: END"), Frame::Done);
        assert_eq!(d.decode_line("data: [DONE]"), Frame::Skip(SkipReason::Malformed));
    }

    #[tokio::test]
    async fn yields_valid_frames_in_order_around_noise() {
        let (stream, stats) = SseDecoder::new().decode(lines(&[
            "",
            "data: {\"n\":1}",
            ": keep-alive",
            "data: {not json",
            "",
            "data: {\"n\":2}",
            "event: ping",
            "data: {\"n\":3}",
        ]));
        let values: Vec<Value> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(values, vec![json!({"n":1}), json!({"n":2}), json!({"n":3})]);
        assert_eq!(stats.frames(), 3);
        assert_eq!(stats.skipped_blank(), 2);
        assert_eq!(stats.skipped_control(), 2);
        assert_eq!(stats.skipped_malformed(), 1);
    }

    #[test]
    fn non_object_json_is_malformed() {
        let d = SseDecoder::new();
        assert_eq!(d.decode_line("data: 42"), Frame::Skip(SkipReason::Malformed));
        assert_eq!(d.decode_line("data: \"ping\""), Frame::Skip(SkipReason::Malformed));
        assert_eq!(d.decode_line("data: [1,2]"), Frame::Skip(SkipReason::Malformed));
        assert_eq!(d.decode_line("data: null"), Frame::Skip(SkipReason::Malformed));
        assert_eq!(d.decode_line("true"), Frame::Skip(SkipReason::Malformed));
    }

    #[tokio::test]
    async fn scalar_frames_are_dropped_between_objects() {
        let (stream, stats) = SseDecoder::new().decode(lines(&[
            "data: {\"n\":1}",
            "data: 7",
            "data: \"heartbeat\"",
            "data: {\"n\":2}",
        ]));
        let values: Vec<Value> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(values, vec![json!({"n":1}), json!({"n":2})]);
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.skipped_malformed(), 2);
    }

    #[tokio::test]
    async fn sentinel_terminates_without_value() {
        let (stream, stats) = SseDecoder::new().decode(lines(&[
            "data: {\"n\":1}",
            "data: [DONE]",
            "data: {\"n\":2}",
        ]));
        let values: Vec<Value> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(values, vec![json!({"n":1})]);
        assert_eq!(stats.frames(), 1);
    }

    #[tokio::test]
    async fn line_errors_pass_through() {
        let items: Vec<Result<String, RequestError>> = vec![
            Ok("data: {\"n\":1}".to_string()),
            Err(RequestError::new(RequestErrorKind::Stream, "reset by peer")),
        ];
        let (stream, _) = SseDecoder::new().decode(Box::pin(stream::iter(items)));
        let out: Vec<_> = stream.collect().await;
        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert_eq!(out[1].as_ref().unwrap_err().message(), "reset by peer");
    }
}
