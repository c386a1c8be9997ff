//! AI Studio 应用与 DataMind 知识库客户端。
//!
//! Clients for the AI Studio chat application API ([`AiApplication`]) and the
//! DataMind knowledge-base API ([`DataMind`]), plus their request and
//! response types.

mod app;
mod datamind;
mod types;

pub use app::{AiApplication, ChatMessageOutput, DEFAULT_PAGE_LIMIT};
pub use datamind::{DataMind, MAX_LIST_LIMIT};
pub use types::{
    ActionResult, AgentThought, BatchStatus, BatchStatusResponse, ChatCompletionResponse,
    ChatMessageRequest, ChatMetadata, ChatStreamDelta, ChatUsage, Conversation, ConversationPage,
    Dataset, DeleteResponse, Document, DocumentResponse, FeedbackRating, FileObject,
    FileUploadResponse, IndexingTechnique, ListDocumentsResponse, ListKnowledgeResponse, Message,
    MessageFile, MessagePage, PreProcessingRule, ProcessMode, ProcessRule, ProcessRules,
    ResponseMode, RetrieverResource, SegmentationRule, TransferMethod, DEFAULT_CURRENCY,
};
