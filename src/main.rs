use std::net::SocketAddr;
use std::sync::Arc;

use emailer::{api_routes, AppState, EmailerConfig, HttpPdfFetcher, StaticLocaleCatalog};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = EmailerConfig::from_env();
    let fetcher = HttpPdfFetcher::new(
        &config.pdf_generator_url,
        config.temporary_directory.clone(),
        config.pdf_fetch_timeout,
    )?;
    let state = AppState::new(Arc::new(StaticLocaleCatalog::builtin()), Arc::new(fetcher));
    let app = api_routes(state);

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .map_err(|error| Box::new(error) as Box<dyn std::error::Error>)?;
    tracing::info!(
        %addr,
        pdf_generator = %config.pdf_generator_url,
        download_dir = %config.temporary_directory.display(),
        "Listening for incoming connections"
    );
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
