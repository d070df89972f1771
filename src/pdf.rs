use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::attachments::Params;

/// Retrieves a rendered document and returns where it was stored.
#[async_trait]
pub trait PdfFetcher: Send + Sync {
    async fn fetch(
        &self,
        authorization: &str,
        organization_id: &str,
        document: &str,
        record_id: &str,
        params: &Params,
        filename: &str,
    ) -> Result<PathBuf>;

    /// Called once the document at `location` has been read, whether or not
    /// reading succeeded.
    async fn release(&self, _location: &Path) -> Result<()> {
        Ok(())
    }
}

/// Client of the PDF generator service. Documents are downloaded to
/// `<download_dir>/<uuid>/<filename>`.
#[derive(Clone)]
pub struct HttpPdfFetcher {
    client: reqwest::Client,
    base_url: Url,
    download_dir: PathBuf,
}

impl HttpPdfFetcher {
    pub fn new(
        base_url: &str,
        download_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid pdf generator url `{base_url}`"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("pdf generator url `{base_url}` cannot be a base"));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build pdf generator client")?;
        Ok(Self {
            client,
            base_url,
            download_dir: download_dir.into(),
        })
    }

    /// `<base>/documents/<document>/<record_id>/<term>`, each segment escaped.
    pub fn endpoint(&self, document: &str, record_id: &str, term: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("pdf generator url cannot be a base"))?
            .pop_if_empty()
            .extend(["documents", document, record_id, term]);
        Ok(url)
    }
}

#[async_trait]
impl PdfFetcher for HttpPdfFetcher {
    async fn fetch(
        &self,
        authorization: &str,
        organization_id: &str,
        document: &str,
        record_id: &str,
        params: &Params,
        filename: &str,
    ) -> Result<PathBuf> {
        let url = self.endpoint(document, record_id, &params.term)?;
        tracing::debug!(%url, %document, %record_id, "requesting document from pdf generator");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .header("organizationid", organization_id)
            .send()
            .await
            .context("failed to contact pdf generator")?
            .error_for_status()
            .context("pdf generator rejected document request")?;

        let dir = self.download_dir.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(disk_name(filename));

        let written = match download(response, &path).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await {
                    tracing::warn!(?cleanup, dir = %dir.display(), "failed to remove partial download");
                }
                return Err(err);
            }
        };

        tracing::debug!(path = %path.display(), bytes = written, "document downloaded");
        Ok(path)
    }

    /// Removes the per-request directory holding `location`.
    async fn release(&self, location: &Path) -> Result<()> {
        let dir = location
            .parent()
            .filter(|dir| dir.parent() == Some(self.download_dir.as_path()))
            .ok_or_else(|| {
                anyhow!(
                    "{} is not a download of this fetcher",
                    location.display()
                )
            })?;
        tokio::fs::remove_dir_all(dir)
            .await
            .with_context(|| format!("failed to remove {}", dir.display()))
    }
}

async fn download(response: reqwest::Response, path: &Path) -> Result<usize> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut written = 0usize;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("pdf generator stream interrupted")?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        written += chunk.len();
    }
    file.flush()
        .await
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(written)
}

/// On-disk name for an attachment filename; tenant names may contain path
/// separators, which must not escape the download directory.
fn disk_name(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "document.pdf".to_string(),
        _ => cleaned,
    }
}
