use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::routes::AppState;

mod logging;
mod routes;
mod tower_ext;

mod env {
    pub const API_PORT: &str = "EDUASSIST_API_PORT";
    pub const PUBLIC_DIR: &str = "EDUASSIST_PUBLIC_DIR";
    pub const UPSTREAM_URL: &str = "EDUASSIST_UPSTREAM_URL";
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::configure_logging()?;

    let app = routes::app(configure_app_state()?);

    let port = std::env::var(env::API_PORT).ok();
    let port = port.and_then(|x| x.parse().ok()).unwrap_or(5000_u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("chat host stopped unexpectedly")
}

fn configure_app_state() -> anyhow::Result<Arc<AppState>> {
    let public_dir = std::env::var(env::PUBLIC_DIR).unwrap_or_else(|_| "public".to_string());

    let upstream = match std::env::var(env::UPSTREAM_URL).ok() {
        Some(url) => Some(
            reqwest::Url::parse(&url)
                .with_context(|| format!("{} is not a valid url: '{url}'", env::UPSTREAM_URL))?,
        ),
        None => {
            tracing::warn!(
                "{} not set, /ask will answer 503 until an answer service is configured",
                env::UPSTREAM_URL
            );
            None
        }
    };

    Ok(Arc::new(AppState {
        public_dir: PathBuf::from(public_dir),
        upstream,
        http: reqwest::Client::new(),
    }))
}
