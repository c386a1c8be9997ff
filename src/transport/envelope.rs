//! Request and response envelopes.

use super::lines::LineStream;
use super::{RequestError, RequestErrorKind};
use bytes::Bytes;
use serde_json::Value;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A plain multipart form field. `mime` is set for fields carrying structured
/// content (e.g. a JSON-encoded options document sent as `text/plain`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub name: String,
    pub value: String,
    pub mime: Option<String>,
}

/// A file attached to a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk; the mime type is guessed from the extension.
    pub async fn from_path(field: impl Into<String>, path: &Path) -> crate::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = guess_mime(path);
        Ok(Self::new(field, file_name, mime, data))
    }
}

/// Mime type by file extension; unknown or missing extensions fall back to
/// `application/octet-stream`.
pub(crate) fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Join path segments into an absolute request path. Each segment is
/// percent-encoded, so an id containing `/`, `?` or `#` stays one segment.
pub(crate) fn encode_path(segments: &[&str]) -> crate::Result<String> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| crate::Error::configuration(format!("invalid path base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| crate::Error::configuration("request path cannot take segments"))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<TextField>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(TextField {
            name: name.into(),
            value: value.into(),
            mime: None,
        });
        self
    }

    pub fn text_with_mime(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.fields.push(TextField {
            name: name.into(),
            value: value.into(),
            mime: Some(mime.into()),
        });
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form, RequestError> {
        let mut form = reqwest::multipart::Form::new();
        for field in &self.fields {
            form = match &field.mime {
                Some(mime) => {
                    let part = reqwest::multipart::Part::text(field.value.clone())
                        .mime_str(mime)
                        .map_err(|e| {
                            RequestError::new(
                                RequestErrorKind::Transport,
                                format!("Invalid mime type '{}': {}", mime, e),
                            )
                        })?;
                    form.part(field.name.clone(), part)
                }
                None => form.text(field.name.clone(), field.value.clone()),
            };
        }
        for file in &self.files {
            let part = reqwest::multipart::Part::stream(file.data.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
                .map_err(|e| {
                    RequestError::new(
                        RequestErrorKind::Transport,
                        format!("Invalid mime type '{}': {}", file.mime, e),
                    )
                })?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// One HTTP call, built by a façade and consumed once by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
    pub stream: bool,
    /// Return the body as raw bytes regardless of content type.
    pub expect_binary: bool,
}

impl RequestEnvelope {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            query: Vec::new(),
            stream: false,
            expect_binary: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn binary(mut self) -> Self {
        self.expect_binary = true;
        self
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Exactly one body form per response.
pub enum ResponseBody {
    Json(Value),
    Lines(LineStream),
    Binary(Bytes),
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Json(v) => f.debug_tuple("Json").field(v).finish(),
            ResponseBody::Lines(_) => f.write_str("Lines(..)"),
            ResponseBody::Binary(b) => write!(f, "Binary({} bytes)", b.len()),
        }
    }
}

/// A successful (status < 400) response.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Result<Value, RequestError> {
        match self.body {
            ResponseBody::Json(v) => Ok(v),
            other => Err(RequestError::decode(
                self.status,
                format!("Expected a JSON response, got {:?}", other),
            )),
        }
    }

    pub fn into_lines(self) -> Result<LineStream, RequestError> {
        match self.body {
            ResponseBody::Lines(lines) => Ok(lines),
            other => Err(RequestError::decode(
                self.status,
                format!("Expected a streaming response, got {:?}", other),
            )),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, RequestError> {
        match self.body {
            ResponseBody::Binary(b) => Ok(b),
            ResponseBody::Json(v) => Ok(Bytes::from(v.to_string())),
            other => Err(RequestError::decode(
                self.status,
                format!("Expected a binary response, got {:?}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_builder_collects_parts() {
        let req = RequestEnvelope::get("/conversations")
            .query("user", "u-1")
            .query("limit", 20)
            .query("pinned", true);
        assert_eq!(req.method.as_str(), "GET");
        assert_eq!(
            req.query,
            vec![
                ("user".to_string(), "u-1".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("pinned".to_string(), "true".to_string()),
            ]
        );
        assert!(req.json_body().is_none());
    }

    #[test]
    fn json_body_round_trips_without_precision_loss() {
        let body = json!({
            "model": "m",
            "temperature": 0.7,
            "top_p": 0.123456789012345,
            "max_tokens": 4096,
            "big": 9007199254740993u64,
        });
        let req = RequestEnvelope::post("/v1/chat/completions").json(body.clone());
        let encoded = serde_json::to_string(req.json_body().unwrap()).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, body);
        assert_eq!(decoded["top_p"].as_f64(), Some(0.123456789012345));
        assert_eq!(decoded["big"].as_u64(), Some(9007199254740993));
    }

    #[test]
    fn guesses_common_mime_types() {
        assert_eq!(guess_mime(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime(Path::new("clip.mp3")), "audio/mpeg");
        assert_eq!(guess_mime(Path::new("report.pdf")), "application/pdf");
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(
            encode_path(&["datasets", "ds-1", "documents"]).unwrap(),
            "/datasets/ds-1/documents"
        );
        assert_eq!(
            encode_path(&["messages", "a/b?c#d", "feedbacks"]).unwrap(),
            "/messages/a%2Fb%3Fc%23d/feedbacks"
        );
        assert_eq!(
            encode_path(&["conversations", "my chat", "name"]).unwrap(),
            "/conversations/my%20chat/name"
        );
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(guess_mime(Path::new("blob.zzq9")), "application/octet-stream");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn into_json_rejects_binary_body() {
        let resp = ResponseEnvelope {
            status: 200,
            content_type: Some("audio/mpeg".into()),
            body: ResponseBody::Binary(Bytes::from_static(b"ID3")),
        };
        let err = resp.into_json().unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::Decode);
        assert_eq!(err.status, Some(200));
    }
}
