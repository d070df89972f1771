use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read once at startup and passed down by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailerConfig {
    /// Address the HTTP server should bind to. `BIND_ADDRESS`, defaults to `0.0.0.0`.
    pub bind_address: String,
    /// `BIND_PORT`, defaults to `8083`.
    pub bind_port: u16,
    /// Base URL of the PDF generator. `PDF_GENERATOR_URL`.
    pub pdf_generator_url: String,
    /// Where fetched documents are written. `TEMPORARY_DIRECTORY`, defaults to
    /// `<system temp>/emailer`.
    pub temporary_directory: PathBuf,
    /// `PDF_FETCH_TIMEOUT_SECS`, defaults to 30 seconds; zero is ignored.
    pub pdf_fetch_timeout: Duration,
}

impl EmailerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            bind_address: read("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            bind_port: read("BIND_PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8083),
            pdf_generator_url: read("PDF_GENERATOR_URL")
                .unwrap_or_else(|| "http://localhost:8300/pdfgenerator".to_string()),
            temporary_directory: read("TEMPORARY_DIRECTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("emailer")),
            pdf_fetch_timeout: Duration::from_secs(
                read("PDF_FETCH_TIMEOUT_SECS")
                    .and_then(|value| value.parse::<u64>().ok())
                    .filter(|value| *value > 0)
                    .unwrap_or(30),
            ),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
