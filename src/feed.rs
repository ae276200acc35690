use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::error::{CatalogError, Result};
use crate::omm::{parse_omm, OmmRecord};

pub fn client(settings: &Settings) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = settings.fetch_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// GET `url` as text. Transport errors and non-2xx statuses are both fetch failures.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    info!(url, "Fetching feed");
    let fetch_err = |source| CatalogError::Fetch {
        url: url.to_string(),
        source,
    };

    let resp = client.get(url).send().await.map_err(fetch_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CatalogError::FetchStatus {
            url: url.to_string(),
            status,
        });
    }
    let body = resp.text().await.map_err(fetch_err)?;
    info!(url, bytes = body.len(), "Feed fetched");
    Ok(body)
}

pub async fn fetch_omm(client: &reqwest::Client, url: &str) -> Result<Vec<OmmRecord>> {
    let body = fetch_text(client, url).await?;
    parse_omm(&body)
}
