//! Shared mock-server fixtures for the integration tests.
#![allow(dead_code)]

use aiplatform::{AiApplication, DataMind, ModelService};
use mockito::{Server, ServerGuard};

pub const API_KEY: &str = "test-key";
pub const BEARER: &str = "Bearer test-key";

pub async fn server() -> ServerGuard {
    Server::new_async().await
}

pub fn app(server: &ServerGuard) -> AiApplication {
    AiApplication::builder()
        .base_url(server.url())
        .api_key(API_KEY)
        .build()
        .expect("build AiApplication")
}

pub fn datamind(server: &ServerGuard) -> DataMind {
    DataMind::builder()
        .base_url(server.url())
        .api_key(API_KEY)
        .build()
        .expect("build DataMind")
}

pub fn maas(server: &ServerGuard, model: &str) -> ModelService {
    ModelService::builder()
        .base_url(server.url())
        .api_key(API_KEY)
        .model_id(model)
        .build()
        .expect("build ModelService")
}

/// SSE body. Bare payloads get a `data: ` prefix and a blank-line separator;
/// blank lines, comments and explicit SSE fields are written as given.
pub fn sse_body(frames: &[&str]) -> String {
    const RAW: &[&str] = &[":", "data:", "event:", "id:", "retry:"];
    frames
        .iter()
        .map(|frame| {
            if frame.is_empty() || RAW.iter().any(|p| frame.starts_with(p)) {
                format!("{}\n", frame)
            } else {
                format!("data: {}\n\n", frame)
            }
        })
        .collect()
}
