use crate::client::core::ServiceCore;
use crate::config::ClientConfig;
use crate::interceptors::{CallInterceptor, InterceptorPipeline};
use crate::telemetry::{TraceInterceptor, TraceSink};
use crate::{Error, ErrorContext, Result};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Implemented by each façade so one builder can construct all three.
pub trait Service: Sized {
    /// Name used in call contexts and logs.
    const NAME: &'static str;
    /// Base URL used when none is configured; `None` makes the URL mandatory.
    const DEFAULT_BASE_URL: Option<&'static str>;

    fn assemble(core: ServiceCore, model_id: Option<String>) -> Self;
}

/// Builder for the service façades.
///
/// Explicit setters win over a supplied [`ClientConfig`]; anything left unset
/// falls back to the config, then to the service default.
pub struct ClientBuilder<T> {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    interceptors: InterceptorPipeline,
    pub(crate) model_id: Option<String>,
    pub(crate) trace_sink: Option<Arc<dyn TraceSink>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Service> Default for ClientBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Service> ClientBuilder<T> {
    pub fn new() -> Self {
        Self {
            config: None,
            base_url: None,
            api_key: None,
            timeout: None,
            proxy: None,
            interceptors: InterceptorPipeline::new(),
            model_id: None,
            trace_sink: None,
            _marker: PhantomData,
        }
    }

    /// Start from a full configuration, e.g. [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overall request timeout. Default 300 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    /// Append an interceptor; hooks run in registration order.
    pub fn interceptor<I: CallInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors = self.interceptors.with(interceptor);
        self
    }

    pub fn interceptor_arc(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.interceptors = self.interceptors.with_arc(interceptor);
        self
    }

    fn resolve_config(&mut self) -> Result<ClientConfig> {
        let mut config = match self.config.take() {
            Some(config) => config,
            None => {
                let api_key = self.api_key.clone().ok_or_else(|| {
                    Error::configuration_with_context(
                        "api_key must be provided",
                        ErrorContext::new()
                            .with_field_path("api_key")
                            .with_source(T::NAME),
                    )
                })?;
                ClientConfig::new(String::new(), api_key)
            }
        };

        if let Some(key) = self.api_key.take() {
            config.api_key = key;
        }
        if let Some(url) = self.base_url.take() {
            config.base_url = url;
        }
        if let Some(timeout) = self.timeout.take() {
            config.timeout = timeout;
        }
        if let Some(proxy) = self.proxy.take() {
            config.proxy_url = Some(proxy);
        }
        if config.base_url.trim().is_empty() {
            match T::DEFAULT_BASE_URL {
                Some(default) => config.base_url = default.to_string(),
                None => {
                    return Err(Error::configuration_with_context(
                        "base_url must be provided",
                        ErrorContext::new()
                            .with_field_path("base_url")
                            .with_source(T::NAME),
                    ))
                }
            }
        }
        config.validated()
    }

    pub fn build(mut self) -> Result<T> {
        let config = self.resolve_config()?;
        let mut interceptors = std::mem::take(&mut self.interceptors);
        if let Some(sink) = self.trace_sink.take() {
            interceptors = interceptors.with(TraceInterceptor::new(sink));
        }
        let model_id = self
            .model_id
            .take()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let core = ServiceCore::new(T::NAME, &config, interceptors)?;
        Ok(T::assemble(core, model_id))
    }
}
