//! AI Studio and DataMind request and response types.

use crate::types::{
    bool_or, f64_or, i64_or, list_of, object_or_empty, opt_i64, opt_str, str_or, string_list,
    u64_or, FromPayload,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Currency and price unit reported when the service omits usage.
pub const DEFAULT_CURRENCY: &str = "INR";

fn opt_f64(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_object(value: &Value, key: &str) -> Option<Map<String, Value>> {
    value.get(key).and_then(Value::as_object).cloned()
}

// ---------------------------------------------------------------------------
// Chat application: requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Blocking,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMethod {
    RemoteUrl,
    LocalFile,
}

/// File reference attached to a chat message (images only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(rename = "type")]
    pub file_type: String,
    pub transfer_method: TransferMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_file_id: Option<String>,
}

impl FileObject {
    pub fn remote_image(url: impl Into<String>) -> Self {
        Self {
            file_type: "image".to_string(),
            transfer_method: TransferMethod::RemoteUrl,
            url: Some(url.into()),
            upload_file_id: None,
        }
    }

    /// An image previously sent through `file_upload`.
    pub fn uploaded_image(upload_file_id: impl Into<String>) -> Self {
        Self {
            file_type: "image".to_string(),
            transfer_method: TransferMethod::LocalFile,
            url: None,
            upload_file_id: Some(upload_file_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackRating {
    Like,
    Dislike,
    /// Clears a previous rating; sent as the string `"null"`.
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub inputs: Map<String, Value>,
    pub query: String,
    pub user: String,
    #[serde(default)]
    pub response_mode: ResponseMode,
    #[serde(default = "default_true")]
    pub auto_generate_name: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileObject>,
}

fn default_true() -> bool {
    true
}

impl ChatMessageRequest {
    pub fn new(query: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            inputs: Map::new(),
            query: query.into(),
            user: user.into(),
            response_mode: ResponseMode::Blocking,
            auto_generate_name: true,
            conversation_id: None,
            files: Vec::new(),
        }
    }

    pub fn response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }

    pub fn streaming(self) -> Self {
        self.response_mode(ResponseMode::Streaming)
    }

    pub fn input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn file(mut self, file: FileObject) -> Self {
        self.files.push(file);
        self
    }

    pub fn auto_generate_name(mut self, enabled: bool) -> Self {
        self.auto_generate_name = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Chat application: responses
// ---------------------------------------------------------------------------

/// Token and cost accounting for one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub prompt_unit_price: f64,
    pub prompt_price: f64,
    pub prompt_price_unit: String,
    pub completion_tokens: u64,
    pub completion_unit_price: f64,
    pub completion_price: f64,
    pub completion_price_unit: String,
    pub total_tokens: u64,
    pub total_price: f64,
    pub currency: String,
    /// Seconds.
    pub latency: f64,
}

impl Default for ChatUsage {
    fn default() -> Self {
        Self {
            prompt_tokens: 0,
            prompt_unit_price: 0.0,
            prompt_price: 0.0,
            prompt_price_unit: DEFAULT_CURRENCY.to_string(),
            completion_tokens: 0,
            completion_unit_price: 0.0,
            completion_price: 0.0,
            completion_price_unit: DEFAULT_CURRENCY.to_string(),
            total_tokens: 0,
            total_price: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            latency: 0.0,
        }
    }
}

impl FromPayload for ChatUsage {
    fn from_payload(v: &Value) -> Self {
        match v.as_object() {
            Some(obj) if !obj.is_empty() => {}
            _ => return Self::default(),
        }
        Self {
            prompt_tokens: u64_or(v, "prompt_tokens", 0),
            prompt_unit_price: f64_or(v, "prompt_unit_price", 0.0),
            prompt_price: f64_or(v, "prompt_price", 0.0),
            prompt_price_unit: str_or(v, "prompt_price_unit", DEFAULT_CURRENCY),
            completion_tokens: u64_or(v, "completion_tokens", 0),
            completion_unit_price: f64_or(v, "completion_unit_price", 0.0),
            completion_price: f64_or(v, "completion_price", 0.0),
            completion_price_unit: str_or(v, "completion_price_unit", DEFAULT_CURRENCY),
            total_tokens: u64_or(v, "total_tokens", 0),
            total_price: f64_or(v, "total_price", 0.0),
            currency: str_or(v, "currency", DEFAULT_CURRENCY),
            latency: f64_or(v, "latency", 0.0),
        }
    }
}

/// A knowledge-base citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverResource {
    pub position: i64,
    pub dataset_id: String,
    pub dataset_name: String,
    pub document_id: String,
    pub document_name: String,
    pub segment_id: String,
    pub score: f64,
    pub content: String,
}

impl FromPayload for RetrieverResource {
    fn from_payload(v: &Value) -> Self {
        Self {
            position: i64_or(v, "position", 0),
            dataset_id: str_or(v, "dataset_id", ""),
            dataset_name: str_or(v, "dataset_name", ""),
            document_id: str_or(v, "document_id", ""),
            document_name: str_or(v, "document_name", ""),
            segment_id: str_or(v, "segment_id", ""),
            score: f64_or(v, "score", 0.0),
            content: str_or(v, "content", ""),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMetadata {
    pub usage: ChatUsage,
    pub retriever_resources: Vec<RetrieverResource>,
}

impl FromPayload for ChatMetadata {
    fn from_payload(v: &Value) -> Self {
        if !v.is_object() {
            return Self::default();
        }
        Self {
            usage: v
                .get("usage")
                .map(ChatUsage::from_payload)
                .unwrap_or_default(),
            retriever_resources: list_of(v, "retriever_resources"),
        }
    }
}

/// Blocking-mode answer of `chat_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub event: String,
    pub message_id: String,
    pub conversation_id: String,
    pub mode: String,
    pub answer: String,
    pub metadata: ChatMetadata,
    pub created_at: i64,
    pub task_id: Option<String>,
}

impl FromPayload for ChatCompletionResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: opt_str(v, "id"),
            event: str_or(v, "event", "message"),
            message_id: str_or(v, "message_id", ""),
            conversation_id: str_or(v, "conversation_id", ""),
            mode: str_or(v, "mode", "chat"),
            answer: str_or(v, "answer", ""),
            metadata: v
                .get("metadata")
                .map(ChatMetadata::from_payload)
                .unwrap_or_default(),
            created_at: i64_or(v, "created_at", 0),
            task_id: opt_str(v, "task_id"),
        }
    }
}

/// One streamed event of `chat_message`. Every field is optional; a missing
/// field never signals the end of the stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamDelta {
    pub event: Option<String>,
    pub task_id: Option<String>,
    pub message_id: Option<String>,
    pub conversation_id: Option<String>,
    pub answer: Option<String>,
    pub created_at: Option<i64>,
    pub metadata: Option<Value>,
    pub id: Option<String>,
}

impl FromPayload for ChatStreamDelta {
    fn from_payload(v: &Value) -> Self {
        Self {
            event: opt_str(v, "event"),
            task_id: opt_str(v, "task_id"),
            message_id: opt_str(v, "message_id"),
            conversation_id: opt_str(v, "conversation_id"),
            answer: opt_str(v, "answer"),
            created_at: opt_i64(v, "created_at"),
            metadata: v.get("metadata").filter(|m| !m.is_null()).cloned(),
            id: opt_str(v, "id"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFile {
    pub id: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub url: String,
    /// `"user"` or `"assistant"`.
    pub belongs_to: String,
}

impl FromPayload for MessageFile {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            file_type: str_or(v, "type", ""),
            url: str_or(v, "url", ""),
            belongs_to: str_or(v, "belongs_to", ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentThought {
    pub id: String,
    pub message_id: String,
    pub position: i64,
    pub thought: String,
    /// Tool names separated by `;`.
    pub tool: String,
    /// JSON text.
    pub tool_input: String,
    pub observation: String,
    pub created_at: i64,
    pub message_files: Vec<String>,
}

impl FromPayload for AgentThought {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            message_id: str_or(v, "message_id", ""),
            position: i64_or(v, "position", 0),
            thought: str_or(v, "thought", ""),
            tool: str_or(v, "tool", ""),
            tool_input: str_or(v, "tool_input", ""),
            observation: str_or(v, "observation", ""),
            created_at: i64_or(v, "created_at", 0),
            message_files: string_list(v, "message_files"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub inputs: Map<String, Value>,
    pub query: String,
    pub answer: String,
    pub message_files: Vec<MessageFile>,
    /// `{"rating": "like" | "dislike"}` or empty.
    pub feedback: Map<String, Value>,
    pub retriever_resources: Vec<RetrieverResource>,
    pub agent_thoughts: Vec<AgentThought>,
    pub created_at: i64,
}

impl FromPayload for Message {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            conversation_id: str_or(v, "conversation_id", ""),
            inputs: object_or_empty(v, "inputs"),
            query: str_or(v, "query", ""),
            answer: str_or(v, "answer", ""),
            message_files: list_of(v, "message_files"),
            feedback: object_or_empty(v, "feedback"),
            retriever_resources: list_of(v, "retriever_resources"),
            agent_thoughts: list_of(v, "agent_thoughts"),
            created_at: i64_or(v, "created_at", 0),
        }
    }
}

/// A page of conversation history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    pub limit: u64,
    pub has_more: bool,
    pub data: Vec<Message>,
}

impl FromPayload for MessagePage {
    fn from_payload(v: &Value) -> Self {
        Self {
            limit: u64_or(v, "limit", 0),
            has_more: bool_or(v, "has_more", false),
            data: list_of(v, "data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub inputs: Map<String, Value>,
    pub introduction: String,
    pub created_at: i64,
    pub status: String,
}

impl FromPayload for Conversation {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            name: str_or(v, "name", ""),
            inputs: object_or_empty(v, "inputs"),
            introduction: str_or(v, "introduction", ""),
            created_at: i64_or(v, "created_at", 0),
            status: str_or(v, "status", ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationPage {
    pub limit: u64,
    pub has_more: bool,
    pub data: Vec<Conversation>,
}

impl FromPayload for ConversationPage {
    fn from_payload(v: &Value) -> Self {
        Self {
            limit: u64_or(v, "limit", 0),
            has_more: bool_or(v, "has_more", false),
            data: list_of(v, "data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub extension: String,
    pub mime_type: String,
    pub created_by: String,
    pub created_at: i64,
}

impl FromPayload for FileUploadResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            name: str_or(v, "name", ""),
            size: u64_or(v, "size", 0),
            extension: str_or(v, "extension", ""),
            mime_type: str_or(v, "mime_type", ""),
            created_by: str_or(v, "created_by", ""),
            created_at: i64_or(v, "created_at", 0),
        }
    }
}

/// `{"result": "success"}` style acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub result: String,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

impl FromPayload for ActionResult {
    fn from_payload(v: &Value) -> Self {
        Self {
            result: str_or(v, "result", ""),
        }
    }
}

// ---------------------------------------------------------------------------
// DataMind: requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingTechnique {
    #[default]
    HighQuality,
    Economy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
    Automatic,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreProcessingRule {
    /// e.g. `remove_extra_spaces`, `remove_urls_emails`.
    pub id: String,
    pub enabled: bool,
}

impl PreProcessingRule {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationRule {
    pub separator: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRules {
    pub pre_processing_rules: Vec<PreProcessingRule>,
    pub segmentation: SegmentationRule,
}

/// How DataMind cleans and segments an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRule {
    pub mode: ProcessMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<ProcessRules>,
}

impl ProcessRule {
    pub fn automatic() -> Self {
        Self {
            mode: ProcessMode::Automatic,
            rules: None,
        }
    }

    pub fn custom(rules: ProcessRules) -> Self {
        Self {
            mode: ProcessMode::Custom,
            rules: Some(rules),
        }
    }

    /// Rule applied to file uploads when none is given: strip extra spaces,
    /// URLs and e-mails; split on `###` into segments of at most 500 tokens.
    pub fn file_default() -> Self {
        Self::custom(ProcessRules {
            pre_processing_rules: vec![
                PreProcessingRule::new("remove_extra_spaces", true),
                PreProcessingRule::new("remove_urls_emails", true),
            ],
            segmentation: SegmentationRule {
                separator: "###".to_string(),
                max_tokens: 500,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// DataMind: responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub provider: String,
    pub permission: String,
    pub data_source_type: Option<String>,
    pub indexing_technique: Option<String>,
    pub app_count: u64,
    pub document_count: u64,
    pub word_count: u64,
    pub created_by: String,
    pub created_at: i64,
    pub updated_by: String,
    pub updated_at: i64,
    pub embedding_model: Option<String>,
    pub embedding_model_provider: Option<String>,
    pub embedding_available: Option<bool>,
    pub retrieval_model_dict: Option<Map<String, Value>>,
    pub tags: Vec<String>,
}

impl FromPayload for Dataset {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            name: str_or(v, "name", ""),
            description: opt_str(v, "description"),
            provider: str_or(v, "provider", ""),
            permission: str_or(v, "permission", ""),
            data_source_type: opt_str(v, "data_source_type"),
            indexing_technique: opt_str(v, "indexing_technique"),
            app_count: u64_or(v, "app_count", 0),
            document_count: u64_or(v, "document_count", 0),
            word_count: u64_or(v, "word_count", 0),
            created_by: str_or(v, "created_by", ""),
            created_at: i64_or(v, "created_at", 0),
            updated_by: str_or(v, "updated_by", ""),
            updated_at: i64_or(v, "updated_at", 0),
            embedding_model: opt_str(v, "embedding_model"),
            embedding_model_provider: opt_str(v, "embedding_model_provider"),
            embedding_available: v.get("embedding_available").and_then(Value::as_bool),
            retrieval_model_dict: opt_object(v, "retrieval_model_dict"),
            tags: string_list(v, "tags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub position: i64,
    pub data_source_type: String,
    pub data_source_info: Map<String, Value>,
    pub dataset_process_rule_id: String,
    pub name: String,
    pub created_from: String,
    pub created_by: String,
    pub created_at: i64,
    pub tokens: u64,
    pub indexing_status: String,
    pub error: Option<String>,
    pub enabled: bool,
    pub disabled_at: Option<i64>,
    pub disabled_by: Option<String>,
    pub archived: bool,
    pub display_status: String,
    pub word_count: u64,
    pub hit_count: u64,
    pub doc_form: String,
    pub data_source_detail_dict: Option<Map<String, Value>>,
}

impl FromPayload for Document {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            position: i64_or(v, "position", 0),
            data_source_type: str_or(v, "data_source_type", ""),
            data_source_info: object_or_empty(v, "data_source_info"),
            dataset_process_rule_id: str_or(v, "dataset_process_rule_id", ""),
            name: str_or(v, "name", ""),
            created_from: str_or(v, "created_from", ""),
            created_by: str_or(v, "created_by", ""),
            created_at: i64_or(v, "created_at", 0),
            tokens: u64_or(v, "tokens", 0),
            indexing_status: str_or(v, "indexing_status", ""),
            error: opt_str(v, "error"),
            enabled: bool_or(v, "enabled", false),
            disabled_at: opt_i64(v, "disabled_at"),
            disabled_by: opt_str(v, "disabled_by"),
            archived: bool_or(v, "archived", false),
            display_status: str_or(v, "display_status", ""),
            word_count: u64_or(v, "word_count", 0),
            hit_count: u64_or(v, "hit_count", 0),
            doc_form: str_or(v, "doc_form", ""),
            data_source_detail_dict: opt_object(v, "data_source_detail_dict"),
        }
    }
}

/// A created or updated document plus the indexing batch it was queued in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub document: Document,
    pub batch: String,
}

impl FromPayload for DocumentResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            document: Document::from_payload(v.get("document").unwrap_or(&Value::Null)),
            batch: str_or(v, "batch", ""),
        }
    }
}

/// Indexing progress of one document. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub id: String,
    pub indexing_status: String,
    pub processing_started_at: f64,
    pub parsing_completed_at: Option<f64>,
    pub cleaning_completed_at: Option<f64>,
    pub splitting_completed_at: Option<f64>,
    pub completed_at: Option<f64>,
    pub paused_at: Option<f64>,
    pub error: Option<String>,
    pub stopped_at: Option<f64>,
    pub completed_segments: u64,
    pub total_segments: u64,
}

impl BatchStatus {
    pub fn is_completed(&self) -> bool {
        self.indexing_status == "completed"
    }
}

impl FromPayload for BatchStatus {
    fn from_payload(v: &Value) -> Self {
        Self {
            id: str_or(v, "id", ""),
            indexing_status: str_or(v, "indexing_status", ""),
            processing_started_at: f64_or(v, "processing_started_at", 0.0),
            parsing_completed_at: opt_f64(v, "parsing_completed_at"),
            cleaning_completed_at: opt_f64(v, "cleaning_completed_at"),
            splitting_completed_at: opt_f64(v, "splitting_completed_at"),
            completed_at: opt_f64(v, "completed_at"),
            paused_at: opt_f64(v, "paused_at"),
            error: opt_str(v, "error"),
            stopped_at: opt_f64(v, "stopped_at"),
            completed_segments: u64_or(v, "completed_segments", 0),
            total_segments: u64_or(v, "total_segments", 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListKnowledgeResponse {
    pub data: Vec<Dataset>,
    pub has_more: bool,
    pub limit: u64,
    pub total: u64,
    pub page: u64,
}

impl FromPayload for ListKnowledgeResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            data: list_of(v, "data"),
            has_more: bool_or(v, "has_more", false),
            limit: u64_or(v, "limit", 0),
            total: u64_or(v, "total", 0),
            page: u64_or(v, "page", 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDocumentsResponse {
    pub data: Vec<Document>,
    pub has_more: bool,
    pub limit: u64,
    pub total: u64,
    pub page: u64,
}

impl FromPayload for ListDocumentsResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            data: list_of(v, "data"),
            has_more: bool_or(v, "has_more", false),
            limit: u64_or(v, "limit", 0),
            total: u64_or(v, "total", 0),
            page: u64_or(v, "page", 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub data: Vec<BatchStatus>,
}

impl FromPayload for BatchStatusResponse {
    fn from_payload(v: &Value) -> Self {
        Self {
            data: list_of(v, "data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// `"success"` when the service confirmed the deletion.
    pub status: String,
}

impl DeleteResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
