//! 模型即服务（MaaS）推理客户端。
//!
//! Model-as-a-Service inference: chat and text completion (blocking or
//! streamed), embeddings, audio transcription and translation, speech
//! synthesis, reranking and model listing.

mod options;
mod service;
mod types;

pub use options::{
    ChatOptions, CompletionOptions, EmbeddingOptions, RerankOptions, SpeechOptions, StopSequence,
    TranscriptionOptions, TranslationOptions,
};
pub use service::{ChatCompletionOutput, CompletionOutput, ModelService, MAX_SPEECH_INPUT_CHARS};
pub use types::{
    AudioFile, ChatChoice, ChatCompletion, ChatCompletionChunk, ChatMessage, ChunkChoice,
    ChunkDelta, Completion, CompletionChoice, CompletionChunk, CompletionChunkChoice,
    EmbeddingData, EmbeddingInput, EmbeddingResponse, EmbeddingUsage, MessageRole, ModelInfo,
    ModelsListResponse, RerankDocument, RerankInput, RerankResponse, TokenUsage, Transcription,
    Translation,
};
