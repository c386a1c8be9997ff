//! Typed event stream (JSON Value -> T).

use super::decode::{DecodeStats, SseDecoder};
use crate::transport::LineStream;
use crate::types::FromPayload;
use crate::{BoxStream, Result};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Lazy, single-pass sequence of typed deltas decoded from a streaming response.
///
/// Each item is one decoded frame mapped through [`FromPayload`]. The only
/// `Err` items are read failures of the underlying connection, after which the
/// stream ends.
pub struct EventStream<T> {
    inner: BoxStream<'static, Value>,
    stats: Arc<DecodeStats>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromPayload> EventStream<T> {
    pub fn new(inner: BoxStream<'static, Value>, stats: Arc<DecodeStats>) -> Self {
        Self {
            // Fused so polling past the end keeps returning `None`.
            inner: Box::pin(inner.fuse()),
            stats,
            _marker: PhantomData,
        }
    }

    pub fn from_lines(lines: LineStream, decoder: &SseDecoder) -> Self {
        let (inner, stats) = decoder.decode(lines);
        Self::new(inner, stats)
    }

    /// Decode counters for this stream; remains valid after the stream is consumed.
    pub fn stats(&self) -> Arc<DecodeStats> {
        Arc::clone(&self.stats)
    }

    /// Drain the stream, stopping at the first read error.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}

impl<T: FromPayload> Stream for EventStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.inner
            .poll_next_unpin(cx)
            .map(|item| item.map(|res| res.map(|v| T::from_payload(&v))))
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("frames", &self.stats.frames())
            .field("skipped_malformed", &self.stats.skipped_malformed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{byte_lines, RequestError};
    use bytes::Bytes;
    use futures::stream;

    #[derive(Debug, PartialEq)]
    struct Piece(String);

    impl FromPayload for Piece {
        fn from_payload(value: &Value) -> Self {
            Piece(crate::types::str_or(value, "answer", ""))
        }
    }

    #[tokio::test]
    async fn maps_frames_and_exposes_stats() {
        let body: Vec<std::result::Result<Bytes, RequestError>> = vec![Ok(Bytes::from_static(
            b"data: {\"answer\":\"Hel\"}\n\ndata: garbage\ndata: {\"answer\":\"lo\"}\ndata: [DONE]\n",
        ))];
        let events: EventStream<Piece> =
            EventStream::from_lines(byte_lines(stream::iter(body)), &SseDecoder::new());
        let stats = events.stats();
        let pieces = events.collect_all().await.unwrap();
        assert_eq!(pieces, vec![Piece("Hel".into()), Piece("lo".into())]);
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.skipped_malformed(), 1);
    }
}
