//! Model-as-a-Service inference client.

use super::options::{
    form_fields, ChatOptions, CompletionOptions, EmbeddingOptions, RerankOptions, SpeechOptions,
    TranscriptionOptions, TranslationOptions,
};
use super::types::{
    AudioFile, ChatCompletion, ChatCompletionChunk, ChatMessage, Completion, CompletionChunk,
    EmbeddingInput, EmbeddingResponse, ModelsListResponse, RerankInput, RerankResponse,
    Transcription, Translation,
};
use crate::client::validation::{require_non_empty, require_text};
use crate::client::{ClientBuilder, Service, ServiceCore};
use crate::config::DEFAULT_MAAS_BASE_URL;
use crate::interceptors::CallContext;
use crate::pipeline::EventStream;
use crate::telemetry::TraceSink;
use crate::transport::{FilePart, MultipartForm, RequestEnvelope};
use crate::{Error, Result};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Longest input accepted by `text_to_speech`, in characters.
pub const MAX_SPEECH_INPUT_CHARS: usize = 4096;

/// Result of [`ModelService::chat_completion`].
#[derive(Debug)]
pub enum ChatCompletionOutput {
    Complete(ChatCompletion),
    Stream(EventStream<ChatCompletionChunk>),
}

impl ChatCompletionOutput {
    pub fn into_complete(self) -> Option<ChatCompletion> {
        match self {
            Self::Complete(c) => Some(c),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<EventStream<ChatCompletionChunk>> {
        match self {
            Self::Stream(s) => Some(s),
            Self::Complete(_) => None,
        }
    }
}

/// Result of [`ModelService::completion`].
#[derive(Debug)]
pub enum CompletionOutput {
    Complete(Completion),
    Stream(EventStream<CompletionChunk>),
}

impl CompletionOutput {
    pub fn into_complete(self) -> Option<Completion> {
        match self {
            Self::Complete(c) => Some(c),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<EventStream<CompletionChunk>> {
        match self {
            Self::Stream(s) => Some(s),
            Self::Complete(_) => None,
        }
    }
}

/// Client for the MaaS inference API.
///
/// One client targets one model; [`ModelService::with_model`] derives a client
/// for another model sharing the same connection pool.
///
/// ```no_run
/// # async fn demo() -> aiplatform::Result<()> {
/// use aiplatform::models::{ChatMessage, ChatOptions, ModelService};
///
/// let maas = ModelService::builder()
///     .api_key("maas-key")
///     .model_id("llama-3-8b")
///     .build()?;
/// let reply = maas
///     .chat_completion(&[ChatMessage::user("Hello")], false, ChatOptions::new())
///     .await?;
/// # let _ = reply;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ModelService {
    core: ServiceCore,
    model_id: Option<String>,
}

impl Service for ModelService {
    const NAME: &'static str = "model_service";
    const DEFAULT_BASE_URL: Option<&'static str> = Some(DEFAULT_MAAS_BASE_URL);

    fn assemble(core: ServiceCore, model_id: Option<String>) -> Self {
        Self { core, model_id }
    }
}

impl ClientBuilder<ModelService> {
    /// Model used by every model-bound operation.
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Record non-streaming chat and text completions to `sink`.
    pub fn trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }
}

impl ModelService {
    pub fn builder() -> ClientBuilder<Self> {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Same connection and interceptors, different model.
    pub fn with_model(&self, model_id: impl Into<String>) -> Self {
        Self {
            core: self.core.clone(),
            model_id: Some(model_id.into()).filter(|m: &String| !m.trim().is_empty()),
        }
    }

    fn require_model(&self) -> Result<&str> {
        self.model_id
            .as_deref()
            .ok_or_else(|| Error::invalid_param("model_id", "model_id is not set for this client"))
    }

    fn context(&self, operation: &'static str, model: &str) -> CallContext {
        self.core.context(operation).with_model(model)
    }

    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        stream: bool,
        options: ChatOptions,
    ) -> Result<ChatCompletionOutput> {
        require_non_empty("messages", messages)?;
        for (i, message) in messages.iter().enumerate() {
            if message.content.trim().is_empty() {
                return Err(Error::invalid_param(
                    "messages",
                    format!("messages[{}].content must not be empty", i),
                ));
            }
        }
        options.validate()?;
        let model = self.require_model()?;

        let mut base = Map::new();
        base.insert("messages".to_string(), serde_json::to_value(messages)?);
        base.insert("stream".to_string(), Value::Bool(stream));
        let body = request_body(model, base, &options)?;
        let ctx = self.context("chat_completion", model).streaming(stream);
        let req = RequestEnvelope::post("/v1/chat/completions")
            .json(body)
            .streaming(stream);
        if stream {
            Ok(ChatCompletionOutput::Stream(
                self.core.call_stream(&ctx, &req).await?,
            ))
        } else {
            Ok(ChatCompletionOutput::Complete(
                self.core.call_typed(&ctx, &req).await?,
            ))
        }
    }

    pub async fn completion(
        &self,
        prompt: &str,
        stream: bool,
        options: CompletionOptions,
    ) -> Result<CompletionOutput> {
        require_text("prompt", prompt)?;
        options.validate()?;
        let model = self.require_model()?;

        let mut base = Map::new();
        base.insert("prompt".to_string(), Value::from(prompt));
        base.insert("stream".to_string(), Value::Bool(stream));
        let body = request_body(model, base, &options)?;
        let ctx = self.context("completion", model).streaming(stream);
        let req = RequestEnvelope::post("/v1/completions")
            .json(body)
            .streaming(stream);
        if stream {
            Ok(CompletionOutput::Stream(
                self.core.call_stream(&ctx, &req).await?,
            ))
        } else {
            Ok(CompletionOutput::Complete(
                self.core.call_typed(&ctx, &req).await?,
            ))
        }
    }

    pub async fn create_embeddings(
        &self,
        input: impl Into<EmbeddingInput>,
        options: EmbeddingOptions,
    ) -> Result<EmbeddingResponse> {
        let input = input.into();
        let items = input.items();
        require_non_empty("input", &items)?;
        for (i, item) in items.iter().enumerate() {
            if item.trim().is_empty() {
                return Err(Error::invalid_param(
                    "input",
                    format!("input[{}] must not be empty", i),
                ));
            }
        }
        options.validate()?;
        let model = self.require_model()?;

        let mut base = Map::new();
        base.insert("input".to_string(), serde_json::to_value(&input)?);
        let body = request_body(model, base, &options)?;
        let ctx = self.context("create_embeddings", model);
        let req = RequestEnvelope::post("/v1/embeddings").json(body);
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn speech_to_text(
        &self,
        file: AudioFile,
        options: TranscriptionOptions,
    ) -> Result<Transcription> {
        if file.is_empty() {
            return Err(Error::invalid_param("file", "file must not be empty"));
        }
        options.validate()?;
        let model = self.require_model()?;
        let form = audio_form(model, file, &options)?;
        let ctx = self.context("speech_to_text", model);
        let req = RequestEnvelope::post("/v1/audio/transcriptions").multipart(form);
        self.core.call_typed(&ctx, &req).await
    }

    /// Translate speech into English text.
    pub async fn audio_translation(
        &self,
        file: AudioFile,
        options: TranslationOptions,
    ) -> Result<Translation> {
        if file.is_empty() {
            return Err(Error::invalid_param("file", "file must not be empty"));
        }
        options.validate()?;
        let model = self.require_model()?;
        let form = audio_form(model, file, &options)?;
        let ctx = self.context("audio_translation", model);
        let req = RequestEnvelope::post("/v1/audio/translations").multipart(form);
        self.core.call_typed(&ctx, &req).await
    }

    /// Synthesize speech. Returns the raw audio bytes.
    pub async fn text_to_speech(
        &self,
        input: &str,
        voice: &str,
        options: SpeechOptions,
    ) -> Result<Bytes> {
        require_text("input", input)?;
        if input.chars().count() > MAX_SPEECH_INPUT_CHARS {
            return Err(Error::invalid_param(
                "input",
                format!("input must not exceed {} characters", MAX_SPEECH_INPUT_CHARS),
            ));
        }
        require_text("voice", voice)?;
        options.validate()?;
        let model = self.require_model()?;

        let mut base = Map::new();
        base.insert("input".to_string(), Value::from(input));
        base.insert("voice".to_string(), Value::from(voice));
        let body = request_body(model, base, &options)?;
        let ctx = self.context("text_to_speech", model);
        let req = RequestEnvelope::post("/v1/audio/speech").json(body).binary();
        self.core.call_binary(&ctx, &req).await
    }

    /// Every model served by the platform. Needs no model id.
    pub async fn list_models(&self) -> Result<ModelsListResponse> {
        let ctx = self.core.context("list_models");
        let req = RequestEnvelope::get("/v1/models");
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn rerank(
        &self,
        query: &str,
        documents: &[RerankInput],
        options: RerankOptions,
    ) -> Result<RerankResponse> {
        require_text("query", query)?;
        require_non_empty("documents", documents)?;
        for (i, doc) in documents.iter().enumerate() {
            match doc.text() {
                Some(text) if !text.trim().is_empty() => {}
                _ => {
                    return Err(Error::invalid_param(
                        "documents",
                        format!("documents[{}] must have non-empty text", i),
                    ))
                }
            }
        }
        options.validate()?;
        let model = self.require_model()?;

        let mut base = Map::new();
        base.insert("query".to_string(), Value::from(query));
        base.insert("documents".to_string(), serde_json::to_value(documents)?);
        let body = request_body(model, base, &options)?;
        let ctx = self.context("rerank", model);
        let req = RequestEnvelope::post("/v1/rerank").json(body);
        self.core.call_typed(&ctx, &req).await
    }
}

/// `model`, the operation's own fields, and whichever options are set.
fn request_body<O: Serialize>(model: &str, base: Map<String, Value>, options: &O) -> Result<Value> {
    let mut body = Map::new();
    body.insert("model".to_string(), Value::from(model));
    body.extend(base);
    if let Value::Object(opts) = serde_json::to_value(options)? {
        body.extend(opts);
    }
    Ok(Value::Object(body))
}

fn audio_form<O: Serialize>(model: &str, file: AudioFile, options: &O) -> Result<MultipartForm> {
    let mut form = MultipartForm::new()
        .file(FilePart::new("file", file.file_name, file.mime, file.data))
        .text("model", model);
    for (name, value) in form_fields(options)? {
        form = form.text(name, value);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(model: Option<&str>) -> ModelService {
        let builder = ModelService::builder()
            .base_url("http://127.0.0.1:1")
            .api_key("k");
        match model {
            Some(m) => builder.model_id(m).build().unwrap(),
            None => builder.build().unwrap(),
        }
    }

    #[test]
    fn default_base_url_applies() {
        let maas = ModelService::builder().api_key("k").build().unwrap();
        assert_eq!(maas.base_url(), DEFAULT_MAAS_BASE_URL);
        assert_eq!(maas.model_id(), None);
    }

    #[test]
    fn blank_model_id_is_unset() {
        assert_eq!(service(Some("  ")).model_id(), None);
        assert_eq!(service(Some("m")).with_model("other").model_id(), Some("other"));
    }

    #[tokio::test]
    async fn model_bound_calls_need_a_model() {
        let err = service(None)
            .chat_completion(&[ChatMessage::user("hi")], false, ChatOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "model_id is not set for this client");
    }

    #[tokio::test]
    async fn message_content_is_checked_per_index() {
        let err = service(Some("m"))
            .chat_completion(
                &[ChatMessage::system("be brief"), ChatMessage::user(" ")],
                false,
                ChatOptions::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "messages[1].content must not be empty");
        let err = service(Some("m"))
            .chat_completion(&[], true, ChatOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "messages must not be empty");
    }

    #[tokio::test]
    async fn argument_checks_precede_network() {
        let maas = service(Some("m"));
        let long = "a".repeat(MAX_SPEECH_INPUT_CHARS + 1);
        let err = maas
            .text_to_speech(&long, "alloy", SpeechOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "input must not exceed 4096 characters");

        let err = maas
            .create_embeddings(vec!["ok", ""], EmbeddingOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "input[1] must not be empty");

        let err = maas
            .rerank("q", &["".into()], RerankOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "documents[0] must have non-empty text");

        let err = maas
            .speech_to_text(AudioFile::new("a.wav", Vec::<u8>::new()), TranscriptionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "file must not be empty");
    }

    #[test]
    fn body_field_order_and_options() {
        let mut base = Map::new();
        base.insert("prompt".to_string(), json!("hi"));
        let body = request_body("m", base, &CompletionOptions::new().max_tokens(5)).unwrap();
        assert_eq!(body, json!({"model": "m", "prompt": "hi", "max_tokens": 5}));
    }

    #[test]
    fn audio_form_carries_model_and_options() {
        let form = audio_form(
            "whisper",
            AudioFile::new("a.mp3", vec![0u8; 4]),
            &TranscriptionOptions::default().language("hi"),
        )
        .unwrap();
        assert_eq!(form.files[0].field, "file");
        assert_eq!(form.files[0].mime, "audio/mpeg");
        let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["model", "language"]);
    }
}
