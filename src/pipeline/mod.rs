//! 流式解码模块：把按行到达的 SSE 响应体解码为有序的 JSON 事件。
//!
//! # Event Decoding Pipeline
//!
//! ```text
//! HTTP body → byte_lines → SseDecoder → JSON Value → FromPayload → typed delta
//!                              │
//!                        DecodeStats (frames / skipped)
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SseDecoder`] | Line classifier and lazy decoder, ends on the done sentinel |
//! | [`Frame`] | Result of decoding one line |
//! | [`DecodeStats`] | Counters for yielded and skipped frames |
//! | [`EventStream`] | Typed `Stream` over the decoded payloads |
//!
//! Malformed frames never raise and never end the stream; they are counted in
//! [`DecodeStats::skipped_malformed`] and logged at `debug`.

pub mod decode;
pub mod stream;

pub use decode::{DecodeStats, Frame, SkipReason, SseDecoder, DEFAULT_DONE_SIGNAL};
pub use stream::EventStream;
