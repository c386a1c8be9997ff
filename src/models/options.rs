//! Typed request options for the inference endpoints.
//!
//! Unset options are omitted from the request body. Each struct rejects
//! unknown keys when deserialized, so option sets loaded from JSON files fail
//! loudly on typos.

use crate::client::validation::{check_optional_range, require_positive, require_text};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn check_optional_text(name: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(v) => require_text(name, v),
        None => Ok(()),
    }
}

fn check_optional_positive(name: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(v) => require_positive(name, u64::from(v)),
        None => Ok(()),
    }
}

/// One stop sequence or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequence {
    One(String),
    Many(Vec<String>),
}

impl StopSequence {
    fn validate(&self) -> Result<()> {
        match self {
            StopSequence::One(s) => require_text("stop", s),
            StopSequence::Many(list) => {
                if list.is_empty() || list.iter().any(|s| s.is_empty()) {
                    return Err(Error::invalid_param("stop", "stop must not be empty"));
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for StopSequence {
    fn from(s: &str) -> Self {
        StopSequence::One(s.to_string())
    }
}

impl From<Vec<String>> for StopSequence {
    fn from(v: Vec<String>) -> Self {
        StopSequence::Many(v)
    }
}

/// Sampling parameters shared by chat and text completion.
fn check_sampling(
    temperature: Option<f64>,
    top_p: Option<f64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    max_tokens: Option<u32>,
    stop: Option<&StopSequence>,
) -> Result<()> {
    check_optional_range("temperature", temperature, 0.0, 2.0)?;
    check_optional_range("top_p", top_p, 0.0, 1.0)?;
    check_optional_range("frequency_penalty", frequency_penalty, -2.0, 2.0)?;
    check_optional_range("presence_penalty", presence_penalty, -2.0, 2.0)?;
    check_optional_positive("max_tokens", max_tokens)?;
    if let Some(stop) = stop {
        stop.validate()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequence>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn stop(mut self, stop: impl Into<StopSequence>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sampling(
            self.temperature,
            self.top_p,
            self.frequency_penalty,
            self.presence_penalty,
            self.max_tokens,
            self.stop.as_ref(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequence>,
    /// Echo the prompt back in the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = Some(echo);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sampling(
            self.temperature,
            self.top_p,
            self.frequency_penalty,
            self.presence_penalty,
            self.max_tokens,
            self.stop.as_ref(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingOptions {
    /// Only `"float"` is accepted; [`EmbeddingData`](super::EmbeddingData)
    /// holds numeric vectors and cannot carry base64 strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl EmbeddingOptions {
    pub fn dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_optional_text("encoding_format", self.encoding_format.as_ref())?;
        if let Some(format) = self.encoding_format.as_deref() {
            if format.trim() != "float" {
                return Err(Error::invalid_param(
                    "encoding_format",
                    format!("encoding_format '{}' is not supported; use \"float\"", format),
                ));
            }
        }
        check_optional_positive("dimensions", self.dimensions)?;
        check_optional_text("user", self.user.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionOptions {
    /// ISO-639-1 code of the spoken language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// `json`, `text`, `srt`, `verbose_json` or `vtt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl TranscriptionOptions {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_optional_text("language", self.language.as_ref())?;
        check_optional_text("prompt", self.prompt.as_ref())?;
        check_optional_text("response_format", self.response_format.as_ref())?;
        check_optional_range("temperature", self.temperature, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl TranslationOptions {
    pub fn validate(&self) -> Result<()> {
        check_optional_text("prompt", self.prompt.as_ref())?;
        check_optional_text("response_format", self.response_format.as_ref())?;
        check_optional_range("temperature", self.temperature, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechOptions {
    /// Audio container, e.g. `mp3`, `wav`, `opus`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl SpeechOptions {
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_optional_text("response_format", self.response_format.as_ref())?;
        check_optional_range("speed", self.speed, 0.25, 4.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RerankOptions {
    /// Defaults to every document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chunks_per_doc: Option<u32>,
}

impl RerankOptions {
    pub fn top_n(mut self, top_n: u32) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_optional_positive("top_n", self.top_n)?;
        check_optional_positive("max_chunks_per_doc", self.max_chunks_per_doc)
    }
}

/// Flatten serialized options into multipart text fields.
pub(crate) fn form_fields<T: Serialize>(options: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(options)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}
