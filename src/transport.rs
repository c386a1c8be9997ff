//! 传输层：发送单个 HTTP 请求，并把网络错误与 HTTP 错误统一映射为 [`RequestError`]。
//!
//! HTTP transport.
//!
//! One [`RequestEnvelope`] in, one [`ResponseEnvelope`] out. Nothing here retries:
//! a failed request surfaces immediately to the caller.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`HttpTransport`] | Issues requests with bearer auth and the configured timeout |
//! | [`RequestEnvelope`] | Method, path, body (JSON or multipart), query, streaming flag |
//! | [`ResponseEnvelope`] | Status plus exactly one of JSON, line stream, or raw bytes |
//! | [`LineStream`] | Forward-only UTF-8 lines of a streaming body, in arrival order |

mod envelope;
mod http;
mod lines;
mod status;

pub use envelope::{
    FilePart, HttpMethod, MultipartForm, RequestBody, RequestEnvelope, ResponseBody,
    ResponseEnvelope, TextField,
};
pub use http::HttpTransport;
pub use lines::{byte_lines, LineStream};
pub use status::{error_message_from_body, is_binary_content_type};
pub(crate) use status::snippet;
pub(crate) use envelope::{encode_path, guess_mime};

/// Which part of the request pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The request or body read exceeded the configured timeout.
    Timeout,
    /// The remote host could not be reached.
    Connection,
    /// Certificate or TLS handshake failure.
    Tls,
    /// Any other client-side failure while issuing the request.
    Transport,
    /// The server answered with status >= 400.
    Status,
    /// A successful response whose body could not be decoded into the expected form.
    Decode,
    /// The connection failed while a streaming body was being read.
    Stream,
}

/// Error raised for anything that went wrong on the wire.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub message: String,
    /// HTTP status code, set for [`RequestErrorKind::Status`] and decode failures.
    pub status: Option<u16>,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: RequestErrorKind::Status,
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: RequestErrorKind::Decode,
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Classify a reqwest failure into timeout, connection, TLS, or generic transport errors.
    ///
    /// Only the error's causes are inspected. The top-level message embeds the
    /// request URL and must not influence the kind.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let (kind, message) = if err.is_timeout() || cause_is_timeout(&err) {
            (RequestErrorKind::Timeout, "Request timeout".to_string())
        } else if cause_mentions(&err, &["certificate", "tls", "handshake"]) {
            (RequestErrorKind::Tls, "SSL/TLS error".to_string())
        } else if err.is_connect() {
            (RequestErrorKind::Connection, "Connection error".to_string())
        } else {
            (RequestErrorKind::Transport, format!("Request failed: {}", err))
        };
        Self {
            kind,
            message,
            status: err.status().map(|s| s.as_u16()),
            source: Some(err),
        }
    }

    /// Same classification, for failures while pulling a streaming body.
    pub(crate) fn from_stream(err: reqwest::Error) -> Self {
        let mut classified = Self::from_reqwest(err);
        if classified.kind == RequestErrorKind::Transport {
            classified.kind = RequestErrorKind::Stream;
            classified.message = format!("Error processing stream: {}", classified.message);
        }
        classified
    }
}

fn any_cause(
    err: &reqwest::Error,
    pred: impl Fn(&(dyn std::error::Error + 'static)) -> bool,
) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if pred(cause) {
            return true;
        }
        source = cause.source();
    }
    false
}

fn cause_is_timeout(err: &reqwest::Error) -> bool {
    any_cause(err, |e| {
        e.downcast_ref::<std::io::Error>()
            .map_or(false, |io| io.kind() == std::io::ErrorKind::TimedOut)
    })
}

fn cause_mentions(err: &reqwest::Error, needles: &[&str]) -> bool {
    any_cause(err, |e| {
        let text = e.to_string().to_lowercase();
        needles.iter().any(|n| text.contains(n))
    })
}
