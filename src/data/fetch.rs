//! Plain HTTP retrieval of HTML documents.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use tracing::info;

use crate::config::Settings;

/// GET `url` and return the body as text. Non-2xx responses are errors.
pub async fn fetch_html(url: &str, settings: &Settings) -> Result<String> {
    let client = http_client(settings)?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {status} for {url}");
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("read body of {url}"))?;
    info!(%url, bytes = body.len(), "fetched document");
    Ok(body)
}

fn http_client(settings: &Settings) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(settings.http_user_agent.as_str())
        .timeout(settings.http_timeout)
        .gzip(true)
        .brotli(true)
        .build()?)
}
