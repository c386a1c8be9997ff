//! 追踪模块：可注入的生成追踪接收器（默认无操作，无全局状态）。
//!
//! Generation tracing.
//!
//! Tracing is an explicitly injected collaborator. A façade built without a
//! sink traces nothing; there is no global client and no environment sniffing.
//! [`TraceInterceptor`] adapts any [`TraceSink`] into a [`CallInterceptor`]
//! that records non-streaming `chat_completion` and `completion` calls.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TraceRecord`] | One traced generation (input, output, usage, latency, status) |
//! | [`TraceSink`] | Trait for trace destinations |
//! | [`NoopTraceSink`] | Default sink, drops everything |
//! | [`InMemoryTraceSink`] | Bounded in-memory sink for tests |
//! | [`LogTraceSink`] | Emits each record as a `tracing` event |

use crate::interceptors::{CallContext, CallInterceptor, ResponseContext};
use crate::transport::RequestEnvelope;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Operations whose non-streaming calls are traced.
pub const TRACED_OPERATIONS: &[&str] = &["chat_completion", "completion"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub request_id: String,
    /// Operation name, e.g. `"chat_completion"`.
    pub name: String,
    pub model: Option<String>,
    /// `{"messages": ...}` or `{"prompt": ...}`, plus the remaining request parameters under `"params"`.
    pub input: Value,
    pub output: Option<String>,
    pub usage: Option<Value>,
    pub latency_ms: f64,
    pub status: TraceStatus,
    pub error: Option<String>,
}

#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn report(&self, record: TraceRecord) -> Result<()>;

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceSink;

#[async_trait]
impl TraceSink for NoopTraceSink {
    async fn report(&self, _record: TraceRecord) -> Result<()> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn TraceSink> {
    Arc::new(NoopTraceSink)
}

/// In-memory sink for testing.
pub struct InMemoryTraceSink {
    records: RwLock<Vec<TraceRecord>>,
    max_records: usize,
}

impl InMemoryTraceSink {
    pub fn new(max: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records: max.max(1),
        }
    }

    pub fn records(&self) -> Vec<TraceRecord> {
        self.records
            .read()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.clear();
    }
}

impl Default for InMemoryTraceSink {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl TraceSink for InMemoryTraceSink {
    async fn report(&self, record: TraceRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(record);
        if records.len() > self.max_records {
            records.remove(0);
        }
        Ok(())
    }
}

/// Emits each record at `info` on the `aiplatform::trace` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTraceSink;

#[async_trait]
impl TraceSink for LogTraceSink {
    async fn report(&self, record: TraceRecord) -> Result<()> {
        let input = serde_json::to_string(&record.input)?;
        info!(
            target: "aiplatform::trace",
            request_id = %record.request_id,
            name = %record.name,
            model = record.model.as_deref().unwrap_or(""),
            latency_ms = record.latency_ms,
            status = ?record.status,
            error = record.error.as_deref().unwrap_or(""),
            input = %input,
            output = record.output.as_deref().unwrap_or(""),
            "generation traced"
        );
        Ok(())
    }
}

/// Adapts a [`TraceSink`] into a [`CallInterceptor`].
///
/// Streaming calls are never traced. Sink failures are logged and swallowed so
/// they cannot fail the traced call.
#[derive(Clone)]
pub struct TraceInterceptor {
    sink: Arc<dyn TraceSink>,
}

impl TraceInterceptor {
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink }
    }

    fn traces(ctx: &CallContext) -> bool {
        !ctx.streaming && TRACED_OPERATIONS.contains(&ctx.operation)
    }

    fn base_record(ctx: &CallContext, req: &RequestEnvelope) -> TraceRecord {
        TraceRecord {
            request_id: ctx.request_id.clone(),
            name: ctx.operation.to_string(),
            model: ctx.model.clone(),
            input: trace_input(ctx.operation, req.json_body()),
            output: None,
            usage: None,
            latency_ms: round_ms(ctx.elapsed().as_secs_f64() * 1000.0),
            status: TraceStatus::Success,
            error: None,
        }
    }

    async fn submit(&self, record: TraceRecord) {
        if let Err(e) = self.sink.report(record).await {
            warn!(error = %e, "trace sink failed to record generation");
        }
    }
}

#[async_trait]
impl CallInterceptor for TraceInterceptor {
    async fn on_response(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
        resp: &ResponseContext<'_>,
    ) {
        if !Self::traces(ctx) {
            return;
        }
        let mut record = Self::base_record(ctx, req);
        record.latency_ms = round_ms(resp.elapsed.as_secs_f64() * 1000.0);
        if let Some(body) = resp.json {
            record.output = Some(trace_output(ctx.operation, body));
            record.usage = body.get("usage").filter(|u| u.is_object()).cloned();
        }
        self.submit(record).await;
    }

    async fn on_error(&self, ctx: &CallContext, req: &RequestEnvelope, err: &Error) {
        if !Self::traces(ctx) {
            return;
        }
        let mut record = Self::base_record(ctx, req);
        record.status = TraceStatus::Error;
        record.error = Some(err.message());
        self.submit(record).await;
    }
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// Splits the request body into the primary input and the remaining parameters.
fn trace_input(operation: &str, body: Option<&Value>) -> Value {
    let key = if operation == "completion" {
        "prompt"
    } else {
        "messages"
    };
    let mut input = Map::new();
    let mut params = Map::new();
    if let Some(Value::Object(body)) = body {
        for (k, v) in body {
            if k != key && k != "model" && k != "stream" {
                params.insert(k.clone(), v.clone());
            }
        }
        input.insert(key.to_string(), body.get(key).cloned().unwrap_or(Value::Null));
    } else {
        input.insert(key.to_string(), Value::Null);
    }
    input.insert("params".to_string(), Value::Object(params));
    Value::Object(input)
}

/// First choice's text; the whole body as text when the shape is unexpected.
fn trace_output(operation: &str, body: &Value) -> String {
    let first = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|c| c.first());
    let text = if operation == "completion" {
        first.and_then(|c| c.get("text")).and_then(Value::as_str)
    } else {
        first
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
    };
    match text {
        Some(t) => t.to_string(),
        None => body.to_string(),
    }
}
