//! Forward-only line source over a streaming response body.

use super::RequestError;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use std::pin::Pin;

/// UTF-8 lines of a streaming body, in arrival order. Single pass.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, RequestError>> + Send + 'static>>;

struct LineState {
    input: Pin<Box<dyn Stream<Item = Result<Bytes, RequestError>> + Send + 'static>>,
    buf: Vec<u8>,
    finished: bool,
}

fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let idx = buf.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buf.drain(..=idx).collect();
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}

/// Split a byte stream into lines.
///
/// Bytes are buffered only until the next `\n`, so a code point split across
/// chunks is decoded intact. `\r\n` and `\n` are both accepted; a trailing
/// partial line is emitted when the input ends. A read error is yielded once
/// and terminates the sequence.
pub fn byte_lines<S>(input: S) -> LineStream
where
    S: Stream<Item = Result<Bytes, RequestError>> + Send + 'static,
{
    let state = LineState {
        input: Box::pin(input),
        buf: Vec::new(),
        finished: false,
    };

    let lines = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = take_line(&mut state.buf) {
                return Some((Ok(line), state));
            }
            if state.finished {
                if state.buf.is_empty() {
                    return None;
                }
                let mut rest = std::mem::take(&mut state.buf);
                if rest.last() == Some(&b'\r') {
                    rest.pop();
                }
                return Some((Ok(String::from_utf8_lossy(&rest).into_owned()), state));
            }
            match state.input.next().await {
                Some(Ok(chunk)) => state.buf.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    state.finished = true;
                    state.buf.clear();
                    return Some((Err(e), state));
                }
                None => state.finished = true,
            }
        }
    });

    Box::pin(lines)
}
