use std::io;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as Base64Engine;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::AttachmentError;
use crate::locale::LocaleCatalog;
use crate::pdf::PdfFetcher;

pub mod api;
pub mod term;

pub use term::Term;

// key: emailer-attachments -> locale-catalog,pdf-fetcher

/// PDF documents the emailer can attach, identified by the tag the PDF
/// generator knows them by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    RentCall,
    RentCallReminder,
    RentCallLastReminder,
    Invoice,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::RentCall,
        DocumentKind::RentCallReminder,
        DocumentKind::RentCallLastReminder,
        DocumentKind::Invoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::RentCall => "rentcall",
            DocumentKind::RentCallReminder => "rentcall_reminder",
            DocumentKind::RentCallLastReminder => "rentcall_last_reminder",
            DocumentKind::Invoice => "invoice",
        }
    }

    /// Locale key of the short label used as the filename prefix.
    pub fn label_key(&self) -> &'static str {
        match self {
            DocumentKind::RentCall => "short_rentcall",
            DocumentKind::RentCallReminder => "short_rentcall_reminder",
            DocumentKind::RentCallLastReminder => "short_rentcall_last_reminder",
            DocumentKind::Invoice => "short_invoice",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub tenant: Tenant,
}

/// Request parameters forwarded to the PDF generator. Only `term` is
/// interpreted here; every other field passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(deserialize_with = "term_from_text_or_number")]
    pub term: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Params {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

fn term_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTerm {
        Text(String),
        Number(u64),
    }

    Ok(match RawTerm::deserialize(deserializer)? {
        RawTerm::Text(text) => text,
        RawTerm::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentPart {
    pub filename: String,
    #[serde(serialize_with = "as_base64")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub attachment: Vec<AttachmentPart>,
}

fn as_base64<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&Base64Engine.encode(data))
}

/// `MM_YY_<reference>`, e.g. `03_24_A42`.
pub fn billing_reference(term: &Term, tenant: &Tenant) -> String {
    format!("{}_{}", term.month_year(), tenant.reference)
}

/// Builds the single PDF attachment of one document kind.
#[derive(Clone)]
pub struct AttachmentBuilder {
    kind: DocumentKind,
    catalog: Arc<dyn LocaleCatalog>,
    fetcher: Arc<dyn PdfFetcher>,
}

impl AttachmentBuilder {
    pub fn new(
        kind: DocumentKind,
        catalog: Arc<dyn LocaleCatalog>,
        fetcher: Arc<dyn PdfFetcher>,
    ) -> Self {
        Self {
            kind,
            catalog,
            fetcher,
        }
    }

    pub fn rentcall_reminder(
        catalog: Arc<dyn LocaleCatalog>,
        fetcher: Arc<dyn PdfFetcher>,
    ) -> Self {
        Self::new(DocumentKind::RentCallReminder, catalog, fetcher)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// `<label>-<tenant name>-<billing reference>.pdf`. Touches neither the
    /// network nor the file system beyond the locale catalog.
    pub fn filename(
        &self,
        locale: &str,
        params: &Params,
        tenant: &Tenant,
    ) -> Result<String, AttachmentError> {
        let term = Term::parse(&params.term)?;
        let billing_ref = billing_reference(&term, tenant);
        let labels = self.catalog.get(locale)?;
        let label = labels.label(self.kind.label_key())?;
        Ok(format!("{label}-{}-{billing_ref}.pdf", tenant.name))
    }

    pub async fn get(
        &self,
        authorization: &str,
        locale: &str,
        organization_id: &str,
        record_id: &str,
        params: &Params,
        context: &Context,
    ) -> Result<Attachment, AttachmentError> {
        let filename = self.filename(locale, params, &context.tenant)?;
        tracing::debug!(
            document = self.kind.as_str(),
            %organization_id,
            %record_id,
            %filename,
            "fetching attachment document"
        );

        let location = self
            .fetcher
            .fetch(
                authorization,
                organization_id,
                self.kind.as_str(),
                record_id,
                params,
                &filename,
            )
            .await
            .map_err(AttachmentError::Fetch)?;

        let data = read_document(&location).await;
        if let Err(err) = self.fetcher.release(&location).await {
            tracing::warn!(?err, path = %location.display(), "failed to release fetched document");
        }
        let data = data?;
        tracing::info!(
            document = self.kind.as_str(),
            %record_id,
            %filename,
            bytes = data.len(),
            "attachment ready"
        );

        Ok(Attachment {
            attachment: vec![AttachmentPart { filename, data }],
        })
    }
}

async fn read_document(path: &Path) -> Result<Vec<u8>, AttachmentError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if data.is_empty() {
        return Err(AttachmentError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "document is empty"),
        });
    }
    Ok(data)
}
