//! DataMind knowledge-base client.

use super::types::{
    ActionResult, BatchStatusResponse, Dataset, DeleteResponse, DocumentResponse,
    IndexingTechnique, ListDocumentsResponse, ListKnowledgeResponse, ProcessRule,
};
use crate::client::validation::{check_range, require_all, require_file, require_text};
use crate::client::{ClientBuilder, Service, ServiceCore};
use crate::transport::{encode_path, FilePart, MultipartForm, RequestEnvelope};
use crate::{Error, Result};
use serde_json::json;
use std::path::Path;
use tracing::debug;

pub const MAX_LIST_LIMIT: u32 = 100;

/// Client for the DataMind knowledge-base API.
#[derive(Debug, Clone)]
pub struct DataMind {
    core: ServiceCore,
}

impl Service for DataMind {
    const NAME: &'static str = "datamind";
    const DEFAULT_BASE_URL: Option<&'static str> = None;

    fn assemble(core: ServiceCore, _model_id: Option<String>) -> Self {
        Self { core }
    }
}

impl DataMind {
    pub fn builder() -> ClientBuilder<Self> {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    /// Create a document from raw text. Without a rule the service segments
    /// automatically.
    pub async fn create_document_from_text(
        &self,
        dataset_id: &str,
        name: &str,
        text: &str,
        technique: IndexingTechnique,
        rule: Option<ProcessRule>,
    ) -> Result<DocumentResponse> {
        require_all(&[("dataset_id", dataset_id), ("name", name), ("text", text)])?;
        let body = json!({
            "name": name,
            "text": text,
            "indexing_technique": technique,
            "process_rule": rule.unwrap_or_else(ProcessRule::automatic),
        });
        let ctx = self.core.context("create_document_from_text");
        let path = encode_path(&["datasets", dataset_id, "document", "create_by_text"])?;
        let req = RequestEnvelope::post(path).json(body);
        self.core.call_typed(&ctx, &req).await
    }

    /// Upload a file as a new document. Without a rule,
    /// [`ProcessRule::file_default`] applies.
    pub async fn create_document_from_file(
        &self,
        dataset_id: &str,
        file_path: impl AsRef<Path>,
        technique: IndexingTechnique,
        rule: Option<ProcessRule>,
    ) -> Result<DocumentResponse> {
        let path = file_path.as_ref();
        require_text("dataset_id", dataset_id)?;
        require_file("file_path", path)?;
        let data = json!({
            "indexing_technique": technique,
            "process_rule": rule.unwrap_or_else(ProcessRule::file_default),
        });
        let form = file_form(&data, path).await?;
        let ctx = self.core.context("create_document_from_file");
        let endpoint = encode_path(&["datasets", dataset_id, "document", "create_by_file"])?;
        let req = RequestEnvelope::post(endpoint).multipart(form);
        self.core.call_typed(&ctx, &req).await
    }

    /// Create an empty knowledge base.
    pub async fn create_knowledge(&self, name: &str) -> Result<Dataset> {
        require_text("name", name)?;
        let ctx = self.core.context("create_knowledge");
        let req = RequestEnvelope::post("/datasets").json(json!({"name": name}));
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn list_knowledge(&self, page: u32, limit: u32) -> Result<ListKnowledgeResponse> {
        if page < 1 {
            return Err(Error::invalid_param("page", "page must be greater than 0"));
        }
        check_range("limit", f64::from(limit), 1.0, f64::from(MAX_LIST_LIMIT))?;
        let ctx = self.core.context("list_knowledge");
        let req = RequestEnvelope::get("/datasets")
            .query("page", page)
            .query("limit", limit);
        self.core.call_typed(&ctx, &req).await
    }

    /// Delete a knowledge base. The service answers 204 with no body.
    pub async fn delete_knowledge(&self, dataset_id: &str) -> Result<DeleteResponse> {
        require_text("dataset_id", dataset_id)?;
        let ctx = self.core.context("delete_knowledge");
        let req = RequestEnvelope::delete(encode_path(&["datasets", dataset_id])?);
        let (status, _) = self.core.call_json(&ctx, &req).await?;
        debug!(dataset_id, status, "knowledge base deleted");
        let status = match status {
            200 | 204 => "success".to_string(),
            other => other.to_string(),
        };
        Ok(DeleteResponse { status })
    }

    pub async fn update_document_text(
        &self,
        dataset_id: &str,
        document_id: &str,
        name: &str,
        text: &str,
    ) -> Result<DocumentResponse> {
        require_all(&[
            ("dataset_id", dataset_id),
            ("document_id", document_id),
            ("name", name),
            ("text", text),
        ])?;
        let ctx = self.core.context("update_document_text");
        let path = encode_path(&[
            "datasets",
            dataset_id,
            "documents",
            document_id,
            "update_by_text",
        ])?;
        let req = RequestEnvelope::post(path).json(json!({"name": name, "text": text}));
        self.core.call_typed(&ctx, &req).await
    }

    /// Replace a document's content with a file. Always re-indexed as
    /// high quality with the default file rule.
    pub async fn update_document_file(
        &self,
        dataset_id: &str,
        document_id: &str,
        file_path: impl AsRef<Path>,
    ) -> Result<DocumentResponse> {
        let path = file_path.as_ref();
        require_all(&[("dataset_id", dataset_id), ("document_id", document_id)])?;
        require_file("file_path", path)?;
        let data = json!({
            "indexing_technique": IndexingTechnique::HighQuality,
            "process_rule": ProcessRule::file_default(),
        });
        let form = file_form(&data, path).await?;
        let ctx = self.core.context("update_document_file");
        let endpoint = encode_path(&[
            "datasets",
            dataset_id,
            "documents",
            document_id,
            "update_by_file",
        ])?;
        let req = RequestEnvelope::post(endpoint).multipart(form);
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn delete_document(&self, dataset_id: &str, document_id: &str) -> Result<ActionResult> {
        require_all(&[("dataset_id", dataset_id), ("document_id", document_id)])?;
        let ctx = self.core.context("delete_document");
        let req = RequestEnvelope::delete(encode_path(&[
            "datasets",
            dataset_id,
            "documents",
            document_id,
        ])?);
        self.core.call_typed(&ctx, &req).await
    }

    /// Indexing progress of the documents queued in `batch`.
    pub async fn get_embedding_status(
        &self,
        dataset_id: &str,
        batch: &str,
    ) -> Result<BatchStatusResponse> {
        require_all(&[("dataset_id", dataset_id), ("batch", batch)])?;
        let ctx = self.core.context("get_embedding_status");
        let path = encode_path(&["datasets", dataset_id, "documents", batch, "indexing-status"])?;
        let req = RequestEnvelope::get(path);
        self.core.call_typed(&ctx, &req).await
    }

    pub async fn list_documents(&self, dataset_id: &str) -> Result<ListDocumentsResponse> {
        require_text("dataset_id", dataset_id)?;
        let ctx = self.core.context("list_documents");
        let req = RequestEnvelope::get(encode_path(&["datasets", dataset_id, "documents"])?);
        self.core.call_typed(&ctx, &req).await
    }
}

/// `data` (JSON text) plus the file itself.
async fn file_form(data: &serde_json::Value, path: &Path) -> Result<MultipartForm> {
    let part = FilePart::from_path("file", path).await?;
    Ok(MultipartForm::new()
        .text_with_mime("data", data.to_string(), "text/plain")
        .file(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datamind() -> DataMind {
        DataMind::builder()
            .base_url("http://127.0.0.1:1")
            .api_key("k")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn list_limit_bounds() {
        let dm = datamind();
        let err = dm.list_knowledge(1, 0).await.unwrap_err();
        assert_eq!(err.message(), "limit must be between 1 and 100");
        let err = dm.list_knowledge(1, 101).await.unwrap_err();
        assert!(err.is_validation());
        let err = dm.list_knowledge(0, 20).await.unwrap_err();
        assert_eq!(err.message(), "page must be greater than 0");
    }

    #[tokio::test]
    async fn missing_upload_file() {
        let err = datamind()
            .create_document_from_file("ds", "/no/such/file.pdf", IndexingTechnique::Economy, None)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "File not found: /no/such/file.pdf");
    }

    #[tokio::test]
    async fn update_text_names_first_blank_argument() {
        let err = datamind()
            .update_document_text("ds", "", "", "body")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "document_id must not be empty");
    }

    #[tokio::test]
    async fn data_part_is_json_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "hello").unwrap();
        let form = file_form(&json!({"indexing_technique": "economy"}), &path)
            .await
            .unwrap();
        assert_eq!(form.fields[0].name, "data");
        assert_eq!(form.fields[0].value, r#"{"indexing_technique":"economy"}"#);
        assert_eq!(form.fields[0].mime.as_deref(), Some("text/plain"));
        assert_eq!(form.files[0].file_name, "doc.txt");
        assert_eq!(form.files[0].mime, "text/plain");
    }
}
