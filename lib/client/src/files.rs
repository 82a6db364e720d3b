//! Client for the storage backend's file operations.
//!
//! Every call is a multipart form POST carrying the session token. Uploads
//! are checked against the plan's limits before anything is sent.

use oxcyshop_core::{FileId, Result};
use oxcyshop_platform_access::{Plan, Session};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::FilesError;

/// A file held by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_id: FileId,
    pub original_name: String,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    stored: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListBody {
    #[serde(default)]
    files: Vec<ListEntry>,
}

impl From<ListEntry> for StoredFile {
    fn from(entry: ListEntry) -> Self {
        Self {
            file_id: FileId::new(entry.stored),
            original_name: entry.name,
        }
    }
}

/// Storage backend client bound to one session.
#[derive(Clone)]
pub struct FileHostClient {
    base_url: String,
    token: String,
    plan: Plan,
    http: reqwest::Client,
}

impl FileHostClient {
    #[must_use]
    pub fn new(base_url: &str, token: impl Into<String>, plan: Plan, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            plan,
            http,
        }
    }

    /// Creates a client for an active session.
    #[must_use]
    pub fn for_session(base_url: &str, session: &Session, http: reqwest::Client) -> Self {
        Self::new(base_url, session.token(), session.user().plan(), http)
    }

    #[must_use]
    pub fn plan(&self) -> Plan {
        self.plan
    }

    /// Direct download link; no request is made.
    #[must_use]
    pub fn download_url(&self, file_id: &FileId) -> String {
        format!("{}/download/{}", self.base_url, file_id)
    }

    fn form(&self) -> Form {
        Form::new().text("token", self.token.clone())
    }

    async fn post(&self, path: &str, form: Form) -> Result<reqwest::Response, FilesError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FilesError::Transport {
                endpoint: endpoint.clone(),
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "storage backend declined");
            return Err(FilesError::Declined {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }

    /// Lists the session's files.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a failure status, or an
    /// unreadable body.
    #[tracing::instrument(skip(self))]
    pub async fn list_files(&self) -> Result<Vec<StoredFile>, FilesError> {
        let response = self.post("/my_files", self.form()).await?;
        let body: ListBody = response
            .json()
            .await
            .map_err(|e| FilesError::InvalidResponse {
                endpoint: format!("{}/my_files", self.base_url),
                details: e.to_string(),
            })?;

        Ok(body.files.into_iter().map(StoredFile::from).collect())
    }

    /// Uploads a file after checking it against the plan.
    ///
    /// `used_bytes` is the storage already in use.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Rejected`] when the plan refuses the file, or a
    /// transport/status error from the backend.
    #[tracing::instrument(skip(self, contents), fields(size = contents.len()))]
    pub async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        used_bytes: u64,
    ) -> Result<(), FilesError> {
        self.plan
            .limits()
            .check_upload(self.plan, file_name, contents.len() as u64, used_bytes)
            .map_err(FilesError::from)?;

        let part = Part::bytes(contents).file_name(file_name.to_string());
        self.post("/upload", self.form().part("file", part)).await?;
        tracing::info!(file_name, "file uploaded");
        Ok(())
    }

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a failure status.
    #[tracing::instrument(skip(self), fields(file_id = %file_id))]
    pub async fn delete(&self, file_id: &FileId) -> Result<(), FilesError> {
        let form = self.form().text("file_id", file_id.as_str().to_string());
        self.post("/delete", form).await?;
        Ok(())
    }

    /// Sets the download password of a file; an empty password removes it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a failure status.
    #[tracing::instrument(skip(self, password), fields(file_id = %file_id))]
    pub async fn set_password(&self, file_id: &FileId, password: &str) -> Result<(), FilesError> {
        let form = self
            .form()
            .text("file_id", file_id.as_str().to_string())
            .text("password", password.to_string());
        self.post("/set_password", form).await?;
        Ok(())
    }
}
