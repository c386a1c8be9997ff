//! Call interceptors: ordered hooks run around every transport call.
//!
//! Interceptors see the request before it is sent, then either the successful
//! response or the error. They cannot change either; they exist for logging,
//! tracing, auditing and similar cross-cutting concerns. Each façade owns its
//! own [`InterceptorPipeline`], so there is no process-wide registration.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::transport::{RequestEnvelope, ResponseEnvelope};
use crate::{Error, Result};

/// Identifies one façade call.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Fresh v4 UUID per call.
    pub request_id: String,
    /// `"ai_application"`, `"datamind"` or `"model_service"`.
    pub service: &'static str,
    pub operation: &'static str,
    pub model: Option<String>,
    pub streaming: bool,
    pub started: Instant,
}

impl CallContext {
    pub fn new(service: &'static str, operation: &'static str) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            service,
            operation,
            model: None,
            streaming: false,
            started: Instant::now(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What interceptors see of a successful response. For streaming calls `json`
/// is `None`: the body has not been read yet when hooks run.
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    pub status: u16,
    pub elapsed: Duration,
    pub json: Option<&'a Value>,
}

#[async_trait]
pub trait CallInterceptor: Send + Sync {
    async fn on_request(&self, _ctx: &CallContext, _req: &RequestEnvelope) {}

    async fn on_response(
        &self,
        _ctx: &CallContext,
        _req: &RequestEnvelope,
        _resp: &ResponseContext<'_>,
    ) {
    }

    async fn on_error(&self, _ctx: &CallContext, _req: &RequestEnvelope, _err: &Error) {}
}

/// Runs interceptor hooks in registration order.
#[derive(Clone, Default)]
pub struct InterceptorPipeline {
    interceptors: Vec<Arc<dyn CallInterceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I: CallInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_arc(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run hooks around a provided async function that performs the actual call.
    pub async fn execute<F, Fut>(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
        f: F,
    ) -> Result<ResponseEnvelope>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<ResponseEnvelope>>,
    {
        for ic in &self.interceptors {
            ic.on_request(ctx, req).await;
        }

        match f().await {
            Ok(resp) => {
                if !self.interceptors.is_empty() {
                    let view = ResponseContext {
                        status: resp.status,
                        elapsed: ctx.elapsed(),
                        json: resp.json(),
                    };
                    for ic in &self.interceptors {
                        ic.on_response(ctx, req, &view).await;
                    }
                }
                Ok(resp)
            }
            Err(err) => {
                for ic in &self.interceptors {
                    ic.on_error(ctx, req, &err).await;
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for InterceptorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorPipeline")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
