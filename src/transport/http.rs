use super::envelope::{HttpMethod, RequestBody, RequestEnvelope, ResponseBody, ResponseEnvelope};
use super::lines::byte_lines;
use super::status::{decode_success_body, error_message_from_body, is_binary_content_type};
use super::RequestError;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorContext};
use crate::Result;
use futures::TryStreamExt;
use reqwest::Proxy;
use tracing::{debug, warn};

/// Issues one HTTP request per [`send`](HttpTransport::send) call. No retries.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpTransport {
    /// Build from an already validated [`ClientConfig`].
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_details(proxy_url.clone()),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope> {
        let url = self.url_for(&envelope.path);
        let mut req = match envelope.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        req = req.bearer_auth(&self.api_key);
        if !envelope.query.is_empty() {
            req = req.query(&envelope.query);
        }
        if envelope.stream {
            req = req.header("accept", "text/event-stream");
        }
        req = match &envelope.body {
            RequestBody::Empty => req,
            RequestBody::Json(body) => req.json(body),
            RequestBody::Multipart(form) => req.multipart(form.to_reqwest()?),
        };

        debug!(
            method = envelope.method.as_str(),
            url = %url,
            stream = envelope.stream,
            "sending request"
        );

        let response = req.send().await.map_err(RequestError::from_reqwest)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status >= 400 {
            let text = response.text().await.unwrap_or_default();
            let message = error_message_from_body(status, content_type.as_deref(), &text);
            warn!(status, url = %url, message = %message, "request failed");
            return Err(RequestError::status(status, message).into());
        }

        if envelope.stream {
            let bytes = response.bytes_stream().map_err(RequestError::from_stream);
            return Ok(ResponseEnvelope {
                status,
                content_type,
                body: ResponseBody::Lines(byte_lines(bytes)),
            });
        }

        let body = response.bytes().await.map_err(RequestError::from_reqwest)?;
        debug!(status, bytes = body.len(), "response received");

        let binary = envelope.expect_binary
            || content_type
                .as_deref()
                .map(is_binary_content_type)
                .unwrap_or(false);
        if binary {
            return Ok(ResponseEnvelope {
                status,
                content_type,
                body: ResponseBody::Binary(body),
            });
        }

        let json = decode_success_body(status, content_type.as_deref(), &body)?;
        Ok(ResponseEnvelope {
            status,
            content_type,
            body: ResponseBody::Json(json),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestErrorKind;

    fn transport(base: &str) -> HttpTransport {
        let cfg = ClientConfig::new(base, "k").validated().unwrap();
        HttpTransport::new(&cfg).unwrap()
    }

    #[test]
    fn joins_paths_onto_base_url() {
        let t = transport("https://api.example.com/maas/");
        assert_eq!(t.base_url(), "https://api.example.com/maas");
        assert_eq!(
            t.url_for("/v1/models"),
            "https://api.example.com/maas/v1/models"
        );
        assert_eq!(
            t.url_for("datasets"),
            "https://api.example.com/maas/datasets"
        );
    }

    #[test]
    fn invalid_proxy_is_a_configuration_error() {
        let cfg = ClientConfig::new("https://api.example.com", "k").with_proxy("::not a proxy::");
        let err = HttpTransport::new(&cfg).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_classified() {
        let t = transport("http://127.0.0.1:1");
        let err = t.send(&RequestEnvelope::get("/v1/models")).await.unwrap_err();
        match err {
            Error::Request(e) => {
                assert_eq!(e.kind, RequestErrorKind::Connection);
                assert_eq!(e.message, "Connection error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn url_text_does_not_decide_error_kind() {
        let t = transport("http://127.0.0.1:1/tls/certificate-timed-out");
        let err = t.send(&RequestEnvelope::get("/connection")).await.unwrap_err();
        match err {
            Error::Request(e) => {
                assert_eq!(e.kind, RequestErrorKind::Connection);
                assert_eq!(e.message, "Connection error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
