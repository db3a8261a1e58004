use crate::api::client::ApiClient;
use crate::types::{
    AppError, CaseId, Document, DocumentPatch, DocumentUpload, Result, UploadFile,
};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct DocumentService {
    client: Arc<ApiClient>,
}

impl DocumentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        self.client.get_json("/documents").await
    }

    pub async fn by_case(&self, case_id: CaseId) -> Result<Vec<Document>> {
        self.client
            .get_json(&format!("/documents/dossier/{}", case_id))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Document> {
        self.client.get_json(&format!("/documents/{}", id)).await
    }

    /// Multipart upload: the file under `file`, plus `description` when given.
    pub async fn upload(&self, case_id: CaseId, upload: &DocumentUpload) -> Result<Document> {
        upload.validate()?;

        let part = Part::bytes(upload.file.bytes.clone())
            .file_name(upload.file.file_name.clone())
            .mime_str(&upload.file.mime_type)
            .map_err(|e| AppError::Validation(format!("invalid MIME type: {}", e)))?;

        let mut form = Form::new().part("file", part);
        if let Some(description) = upload
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            form = form.text("description", description.to_string());
        }

        self.client
            .post_multipart(&format!("/documents/upload/{}", case_id), form)
            .await
    }

    /// Binary content of the document.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("/documents/{}/download", id))
            .await
    }

    pub async fn update(&self, id: i64, patch: &DocumentPatch) -> Result<Document> {
        self.client.put_json(&format!("/documents/{}", id), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/documents/{}", id)).await
    }
}

impl UploadFile {
    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AppError::Validation(format!(
                "{} is not a readable file",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}
