//! # aiplatform
//!
//! AI 平台客户端 SDK：AI Studio 应用、DataMind 知识库与模型即服务（MaaS）推理。
//!
//! Client SDK for the AI Platform HTTP services. It builds requests, injects
//! bearer authentication, decodes JSON and server-sent-event responses and
//! maps them onto typed results. No AI, retrieval or indexing logic runs
//! locally.
//!
//! ## Services
//!
//! - [`AiApplication`]: chat applications built in AI Studio (messages,
//!   conversations, feedback, image upload)
//! - [`DataMind`]: knowledge bases and their documents
//! - [`ModelService`]: chat/text completion, embeddings, audio, reranking
//!
//! Every call issues exactly one HTTP request. Requests fail fast: there are
//! no retries, and argument errors are reported before anything is sent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aiplatform::models::{ChatMessage, ChatOptions};
//! use aiplatform::ModelService;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> aiplatform::Result<()> {
//!     let maas = ModelService::builder()
//!         .api_key("your-api-key")
//!         .model_id("llama-3-8b-instruct")
//!         .build()?;
//!
//!     let messages = [ChatMessage::user("Hello, how are you?")];
//!     let output = maas.chat_completion(&messages, true, ChatOptions::new()).await?;
//!     if let Some(mut stream) = output.into_stream() {
//!         while let Some(chunk) = stream.next().await {
//!             print!("{}", chunk?.delta_text().unwrap_or_default());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`studio`] | AI Studio application and DataMind clients and types |
//! | [`models`] | MaaS client, typed options and results |
//! | [`client`] | Shared builder, service core and argument validation |
//! | [`transport`] | HTTP transport, request/response envelopes, error mapping |
//! | [`pipeline`] | Server-sent-event decoding and typed event streams |
//! | [`types`] | Lenient JSON-to-struct mapping |
//! | [`interceptors`] | Hooks around every call |
//! | [`telemetry`] | Injectable generation tracing |
//! | [`config`] | Client configuration and environment loading |

pub mod client;
pub mod config;
pub mod interceptors;
pub mod models;
pub mod pipeline;
pub mod studio;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use client::ClientBuilder;
pub use config::ClientConfig;
pub use models::ModelService;
pub use pipeline::EventStream;
pub use studio::{AiApplication, DataMind};
pub use transport::{RequestError, RequestErrorKind};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible items.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
