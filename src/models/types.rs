//! Model-as-a-Service request inputs and typed results.

use crate::types::{
    f64_or, i64_or, list_of, opt_str, str_or, string_list, u64_or, FromPayload,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    /// Unknown roles in responses are read as `Assistant`.
    fn parse(s: &str) -> Self {
        match s {
            "system" => MessageRole::System,
            "user" => MessageRole::User,
            "tool" => MessageRole::Tool,
            _ => MessageRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

impl FromPayload for ChatMessage {
    fn from_payload(v: &Value) -> Self {
        Self {
            role: MessageRole::parse(&str_or(v, "role", "assistant")),
            content: str_or(v, "content", ""),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl FromPayload for TokenUsage {
    fn from_payload(v: &Value) -> Self {
        Self {
            prompt_tokens: u64_or(v, "prompt_tokens", 0),
            completion_tokens: u64_or(v, "completion_tokens", 0),
            total_tokens: u64_or(v, "total_tokens", 0),
        }
    }
}

fn usage_of(v: &Value) -> TokenUsage {
    v.get("usage")
        .map(TokenUsage::from_payload)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u64,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl FromPayload for ChatChoice {
    fn from_payload(v: &Value) -> Self {
        Self {
            index: u64_or(v, "index", 0),
            message: ChatMessage::from_payload(v.get("message").unwrap_or(&Value::Null)),
            finish_reason: opt_str(v, "finish_reason"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: TokenUsage,
}

impl ChatCompletion {
    /// Content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

impl FromPayload for ChatCompletion {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            object: str_or(v, "object", "chat.completion"),
            created: i64_or(v, "created", 0),
            model: str_or(v, "model", ""),
            choices: list_of(v, "choices"),
            usage: usage_of(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDelta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl FromPayload for ChunkDelta {
    fn from_payload(v: &Value) -> Self {
        Self {
            role: opt_str(v, "role"),
            content: opt_str(v, "content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u64,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

impl FromPayload for ChunkChoice {
    fn from_payload(v: &Value) -> Self {
        Self {
            index: u64_or(v, "index", 0),
            delta: v
                .get("delta")
                .map(ChunkDelta::from_payload)
                .unwrap_or_default(),
            finish_reason: opt_str(v, "finish_reason"),
        }
    }
}

/// One streamed chat completion event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
    /// Zero unless the service reports usage on this chunk (usually the last).
    pub usage: TokenUsage,
    pub stream_summary: Option<Map<String, Value>>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice's delta, if any.
    pub fn delta_text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

impl FromPayload for ChatCompletionChunk {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            object: str_or(v, "object", "chat.completion.chunk"),
            created: i64_or(v, "created", 0),
            model: str_or(v, "model", ""),
            choices: list_of(v, "choices"),
            usage: usage_of(v),
            stream_summary: v.get("stream_summary").and_then(Value::as_object).cloned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text completion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub index: u64,
    pub text: String,
    pub logprobs: Option<Value>,
    pub finish_reason: Option<String>,
    pub stop_reason: Option<String>,
    pub prompt_logprobs: Option<Value>,
}

fn non_null(v: &Value, key: &str) -> Option<Value> {
    v.get(key).filter(|x| !x.is_null()).cloned()
}

impl FromPayload for CompletionChoice {
    fn from_payload(v: &Value) -> Self {
        Self {
            index: u64_or(v, "index", 0),
            text: str_or(v, "text", ""),
            logprobs: non_null(v, "logprobs"),
            finish_reason: opt_str(v, "finish_reason"),
            // Some backends report a numeric stop token id here.
            stop_reason: match v.get("stop_reason") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
            prompt_logprobs: non_null(v, "prompt_logprobs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: TokenUsage,
}

impl Completion {
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

impl FromPayload for Completion {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            object: str_or(v, "object", "text_completion"),
            created: i64_or(v, "created", 0),
            model: str_or(v, "model", ""),
            choices: list_of(v, "choices"),
            usage: usage_of(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChunkChoice {
    pub index: u64,
    pub text: String,
    pub finish_reason: Option<String>,
}

impl FromPayload for CompletionChunkChoice {
    fn from_payload(v: &Value) -> Self {
        Self {
            index: u64_or(v, "index", 0),
            text: str_or(v, "text", ""),
            finish_reason: opt_str(v, "finish_reason"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChunkChoice>,
    pub usage: TokenUsage,
}

impl FromPayload for CompletionChunk {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            object: str_or(v, "object", "text_completion"),
            created: i64_or(v, "created", 0),
            model: str_or(v, "model", ""),
            choices: list_of(v, "choices"),
            usage: usage_of(v),
        }
    }
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

/// A single text or a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    pub(crate) fn items(&self) -> Vec<&str> {
        match self {
            EmbeddingInput::Single(s) => vec![s.as_str()],
            EmbeddingInput::Batch(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(s: &str) -> Self {
        EmbeddingInput::Single(s.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(s: String) -> Self {
        EmbeddingInput::Single(s)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(v: Vec<String>) -> Self {
        EmbeddingInput::Batch(v)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(v: Vec<&str>) -> Self {
        EmbeddingInput::Batch(v.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    pub object: String,
    pub embedding: Vec<f64>,
    pub index: u64,
}

impl FromPayload for EmbeddingData {
    fn from_payload(v: &Value) -> Self {
        Self {
            object: str_or(v, "object", "embedding"),
            embedding: v
                .get("embedding")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_f64).collect())
                .unwrap_or_default(),
            index: u64_or(v, "index", 0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u64,
    pub total_tokens: u64,
}

impl FromPayload for EmbeddingUsage {
    fn from_payload(v: &Value) -> Self {
        Self {
            prompt_tokens: u64_or(v, "prompt_tokens", 0),
            total_tokens: u64_or(v, "total_tokens", 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,
    pub data: Vec<EmbeddingData>,
    pub model: String,
    pub usage: EmbeddingUsage,
}

impl EmbeddingResponse {
    /// Vectors ordered by input index.
    pub fn vectors(&self) -> Vec<&[f64]> {
        let mut data: Vec<&EmbeddingData> = self.data.iter().collect();
        data.sort_by_key(|d| d.index);
        data.into_iter().map(|d| d.embedding.as_slice()).collect()
    }
}

impl FromPayload for EmbeddingResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            object: str_or(v, "object", "list"),
            data: list_of(v, "data"),
            model: str_or(v, "model", ""),
            usage: v
                .get("usage")
                .map(EmbeddingUsage::from_payload)
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

const MODEL_INFO_KEYS: &[&str] = &["id", "name", "model_type", "max_tokens", "dimensions", "language"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    /// `llm`, `embedding`, `audio` or `rerank`.
    pub model_type: String,
    pub max_tokens: Option<u64>,
    pub dimensions: Option<u64>,
    pub language: Option<Vec<String>>,
    /// Any further fields the service reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FromPayload for ModelInfo {
    fn from_payload(v: &Value) -> Self {
        let id = str_or(v, "id", "");
        let extra = v
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(k, _)| !MODEL_INFO_KEYS.contains(&k.as_str()))
                    .map(|(k, val)| (k.clone(), val.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: opt_str(v, "name").unwrap_or_else(|| id.clone()),
            id,
            model_type: str_or(v, "model_type", ""),
            max_tokens: v.get("max_tokens").and_then(Value::as_u64),
            dimensions: v.get("dimensions").and_then(Value::as_u64),
            language: v
                .get("language")
                .filter(|l| l.is_array())
                .map(|_| string_list(v, "language")),
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelsListResponse {
    pub models: Vec<ModelInfo>,
}

impl FromPayload for ModelsListResponse {
    fn from_payload(v: &Value) -> Self {
        // OpenAI-style servers list under `data`.
        let key = if v.get("models").is_some() { "models" } else { "data" };
        Self {
            models: list_of(v, key),
        }
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
}

impl FromPayload for Transcription {
    fn from_payload(v: &Value) -> Self {
        Self {
            text: str_or(v, "text", ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
}

impl FromPayload for Translation {
    fn from_payload(v: &Value) -> Self {
        Self {
            text: str_or(v, "text", ""),
        }
    }
}

/// Audio content sent to the transcription and translation endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub file_name: String,
    pub mime: String,
    pub data: Bytes,
}

impl AudioFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime = crate::transport::guess_mime(Path::new(&file_name));
        Self {
            file_name,
            mime,
            data: data.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        Ok(Self::new(file_name, data))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rerank
// ---------------------------------------------------------------------------

/// A document to rerank: plain text, or an object carrying a `text` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RerankInput {
    Text(String),
    Object(Map<String, Value>),
}

impl RerankInput {
    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            RerankInput::Text(s) => Some(s),
            RerankInput::Object(obj) => obj.get("text").and_then(Value::as_str),
        }
    }
}

impl From<&str> for RerankInput {
    fn from(s: &str) -> Self {
        RerankInput::Text(s.to_string())
    }
}

impl From<String> for RerankInput {
    fn from(s: String) -> Self {
        RerankInput::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankDocument {
    /// Position of the document in the request.
    pub index: u64,
    pub relevance_score: f64,
    /// Present when `return_documents` was requested.
    pub document: Option<Value>,
}

impl FromPayload for RerankDocument {
    fn from_payload(v: &Value) -> Self {
        Self {
            index: u64_or(v, "index", 0),
            relevance_score: f64_or(v, "relevance_score", 0.0),
            document: non_null(v, "document"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
    pub id: String,
    pub results: Vec<RerankDocument>,
    pub meta: Option<Map<String, Value>>,
}

impl FromPayload for RerankResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            results: list_of(v, "results"),
            meta: v.get("meta").and_then(Value::as_object).cloned(),
        }
    }
}
