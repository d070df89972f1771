pub mod attachments;
pub mod config;
pub mod error;
pub mod extractor;
pub mod locale;
pub mod pdf;
pub mod routes;

pub use attachments::{
    Attachment, AttachmentBuilder, AttachmentPart, Context, DocumentKind, Params, Tenant, Term,
};
pub use config::EmailerConfig;
pub use error::{AppError, AttachmentError};
pub use locale::{LabelMap, LocaleCatalog, StaticLocaleCatalog};
pub use pdf::{HttpPdfFetcher, PdfFetcher};
pub use routes::{api_routes, AppState};
