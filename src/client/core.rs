use crate::config::ClientConfig;
use crate::interceptors::{CallContext, InterceptorPipeline};
use crate::pipeline::{EventStream, SseDecoder};
use crate::transport::{HttpTransport, RequestEnvelope, ResponseEnvelope};
use crate::types::FromPayload;
use crate::Result;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

/// Transport plus interceptors, shared by every façade.
///
/// Holds no per-call state: each method issues exactly one request.
#[derive(Debug, Clone)]
pub struct ServiceCore {
    service: &'static str,
    transport: HttpTransport,
    interceptors: InterceptorPipeline,
    decoder: SseDecoder,
}

impl ServiceCore {
    pub(crate) fn new(
        service: &'static str,
        config: &ClientConfig,
        interceptors: InterceptorPipeline,
    ) -> Result<Self> {
        Ok(Self {
            service,
            transport: HttpTransport::new(config)?,
            interceptors,
            decoder: SseDecoder::new(),
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub(crate) fn context(&self, operation: &'static str) -> CallContext {
        CallContext::new(self.service, operation)
    }

    /// Send through the interceptor pipeline.
    pub(crate) async fn call(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
    ) -> Result<ResponseEnvelope> {
        debug!(
            service = self.service,
            operation = ctx.operation,
            request_id = %ctx.request_id,
            "dispatching call"
        );
        self.interceptors
            .execute(ctx, req, || self.transport.send(req))
            .await
    }

    pub(crate) async fn call_json(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
    ) -> Result<(u16, Value)> {
        let resp = self.call(ctx, req).await?;
        let status = resp.status;
        Ok((status, resp.into_json()?))
    }

    pub(crate) async fn call_typed<T: FromPayload>(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
    ) -> Result<T> {
        let (_, body) = self.call_json(ctx, req).await?;
        Ok(T::from_payload(&body))
    }

    pub(crate) async fn call_stream<T: FromPayload>(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
    ) -> Result<EventStream<T>> {
        let resp = self.call(ctx, req).await?;
        Ok(EventStream::from_lines(resp.into_lines()?, &self.decoder))
    }

    pub(crate) async fn call_binary(
        &self,
        ctx: &CallContext,
        req: &RequestEnvelope,
    ) -> Result<Bytes> {
        let resp = self.call(ctx, req).await?;
        Ok(resp.into_bytes()?)
    }
}
