//! AI Studio chat application client.

use super::types::{
    ActionResult, ChatCompletionResponse, ChatMessageRequest, ChatStreamDelta, Conversation,
    ConversationPage, FeedbackRating, FileUploadResponse, MessagePage, ResponseMode,
};
use crate::client::validation::{require_all, require_file, require_text};
use crate::client::{ClientBuilder, Service, ServiceCore};
use crate::pipeline::EventStream;
use crate::transport::{encode_path, FilePart, MultipartForm, RequestEnvelope};
use crate::{Error, Result};
use serde_json::{json, Map, Value};
use std::path::Path;

/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Image types accepted by `file_upload`.
const UPLOAD_IMAGE_TYPES: &[&str] = &["png", "jpeg", "jpg", "webp", "gif"];

/// Outcome of [`AiApplication::chat_message`], decided by the request's
/// response mode.
#[derive(Debug)]
pub enum ChatMessageOutput {
    Blocking(ChatCompletionResponse),
    Streaming(EventStream<ChatStreamDelta>),
}

impl ChatMessageOutput {
    pub fn into_blocking(self) -> Option<ChatCompletionResponse> {
        match self {
            Self::Blocking(resp) => Some(resp),
            Self::Streaming(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<EventStream<ChatStreamDelta>> {
        match self {
            Self::Streaming(stream) => Some(stream),
            Self::Blocking(_) => None,
        }
    }
}

/// Client for an AI Studio chat application.
///
/// ```no_run
/// # async fn demo() -> aiplatform::Result<()> {
/// use aiplatform::studio::{AiApplication, ChatMessageRequest};
///
/// let app = AiApplication::builder()
///     .base_url("https://studio.example.com/v1")
///     .api_key("app-key")
///     .build()?;
/// let answer = app
///     .chat_message(ChatMessageRequest::new("What is RAG?", "user-1"))
///     .await?
///     .into_blocking();
/// # let _ = answer;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AiApplication {
    core: ServiceCore,
}

impl Service for AiApplication {
    const NAME: &'static str = "ai_application";
    const DEFAULT_BASE_URL: Option<&'static str> = None;

    fn assemble(core: ServiceCore, _model_id: Option<String>) -> Self {
        Self { core }
    }
}

impl AiApplication {
    pub fn builder() -> ClientBuilder<Self> {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    /// Send a chat message. Streaming mode returns the deltas lazily.
    pub async fn chat_message(&self, request: ChatMessageRequest) -> Result<ChatMessageOutput> {
        require_all(&[("query", request.query.as_str()), ("user", request.user.as_str())])?;
        let streaming = request.response_mode == ResponseMode::Streaming;
        let body = serde_json::to_value(&request)?;
        let ctx = self.core.context("chat_message").streaming(streaming);
        let req = RequestEnvelope::post("/chat-messages")
            .json(body)
            .streaming(streaming);
        if streaming {
            Ok(ChatMessageOutput::Streaming(
                self.core.call_stream(&ctx, &req).await?,
            ))
        } else {
            Ok(ChatMessageOutput::Blocking(
                self.core.call_typed(&ctx, &req).await?,
            ))
        }
    }

    /// Upload an image for use in a later chat message.
    pub async fn file_upload(
        &self,
        file_path: impl AsRef<Path>,
        user: &str,
    ) -> Result<FileUploadResponse> {
        let path = file_path.as_ref();
        require_text("file_path", &path.to_string_lossy())?;
        require_text("user", user)?;
        require_file("file_path", path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !UPLOAD_IMAGE_TYPES.contains(&ext.as_str()) {
            return Err(Error::invalid_param(
                "file_path",
                format!(
                    "Unsupported file type '{}'. Allowed types: {}",
                    ext,
                    UPLOAD_IMAGE_TYPES.join(", ")
                ),
            ));
        }

        let part = FilePart::from_path("file", path).await?;
        let form = MultipartForm::new().file(part).text("user", user);
        let ctx = self.core.context("file_upload");
        let req = RequestEnvelope::post("/files/upload").multipart(form);
        self.core.call_typed(&ctx, &req).await
    }

    /// Message history of one conversation, newest first. `first_id` pages
    /// backwards from that message.
    pub async fn get_conversation_messages(
        &self,
        user: &str,
        conversation_id: &str,
        first_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<MessagePage> {
        require_all(&[("user", user), ("conversation_id", conversation_id)])?;
        let mut req = RequestEnvelope::get("/messages")
            .query("user", user)
            .query("conversation_id", conversation_id)
            .query("limit", limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        if let Some(first_id) = first_id.filter(|f| !f.trim().is_empty()) {
            req = req.query("first_id", first_id);
        }
        let ctx = self.core.context("get_conversation_messages");
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn get_conversations(
        &self,
        user: &str,
        last_id: Option<&str>,
        limit: Option<u32>,
        pinned: Option<bool>,
    ) -> Result<ConversationPage> {
        require_text("user", user)?;
        let mut req = RequestEnvelope::get("/conversations")
            .query("user", user)
            .query("limit", limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        if let Some(last_id) = last_id.filter(|l| !l.trim().is_empty()) {
            req = req.query("last_id", last_id);
        }
        if let Some(pinned) = pinned {
            req = req.query("pinned", pinned);
        }
        let ctx = self.core.context("get_conversations");
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn send_message_feedback(
        &self,
        message_id: &str,
        user: &str,
        rating: FeedbackRating,
    ) -> Result<ActionResult> {
        require_all(&[("message_id", message_id), ("user", user)])?;
        let body = json!({"rating": rating, "user": user});
        let ctx = self.core.context("send_message_feedback");
        let path = encode_path(&["messages", message_id, "feedbacks"])?;
        let req = RequestEnvelope::post(path).json(body);
        self.core.call_typed(&ctx, &req).await
    }

    /// Rename a conversation, or let the service generate a name when
    /// `auto_generate` is set.
    pub async fn rename_conversation(
        &self,
        conversation_id: &str,
        user: &str,
        name: Option<&str>,
        auto_generate: bool,
    ) -> Result<Conversation> {
        require_all(&[("conversation_id", conversation_id), ("user", user)])?;
        let mut body = Map::new();
        match name {
            Some(name) if !name.trim().is_empty() => {
                body.insert("name".to_string(), Value::from(name));
            }
            _ if !auto_generate => {
                return Err(Error::invalid_param(
                    "name",
                    "name must not be empty unless auto_generate is set",
                ));
            }
            _ => {}
        }
        body.insert("auto_generate".to_string(), Value::Bool(auto_generate));
        body.insert("user".to_string(), Value::from(user));
        let ctx = self.core.context("rename_conversation");
        let path = encode_path(&["conversations", conversation_id, "name"])?;
        let req = RequestEnvelope::post(path).json(Value::Object(body));
        self.core.call_typed(&ctx, &req).await
    }

    /// Stop a streaming generation. Only works in streaming mode.
    pub async fn stop_generate_message(&self, task_id: &str, user: &str) -> Result<ActionResult> {
        require_all(&[("task_id", task_id), ("user", user)])?;
        let ctx = self.core.context("stop_generate_message");
        let path = encode_path(&["chat-messages", task_id, "stop"])?;
        let req = RequestEnvelope::post(path).json(json!({"user": user}));
        self.core.call_typed(&ctx, &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AiApplication {
        AiApplication::builder()
            .base_url("http://127.0.0.1:1")
            .api_key("k")
            .build()
            .unwrap()
    }

    #[test]
    fn base_url_is_required() {
        let err = AiApplication::builder().api_key("k").build().unwrap_err();
        assert_eq!(err.message(), "base_url must be provided");
    }

    #[tokio::test]
    async fn blank_query_rejected_before_sending() {
        let err = app()
            .chat_message(ChatMessageRequest::new("  ", "u1"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.message(), "query must not be empty");
    }

    #[tokio::test]
    async fn upload_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let err = app().file_upload(&path, "u1").await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.message().starts_with("Unsupported file type 'txt'"));
    }

    #[tokio::test]
    async fn rename_needs_name_or_auto_generate() {
        let err = app()
            .rename_conversation("c1", "u1", None, false)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("name")
        );
    }
}
