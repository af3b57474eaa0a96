use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not fetch `{url}`: {source}")]
    Request { url: Url, source: reqwest::Error },

    #[error("`{url}` returned an error status: {status}")]
    Status { url: Url, status: StatusCode },

    #[error("could not read the response when fetching `{url}`: {source}")]
    Body { url: Url, source: reqwest::Error },
}

/// Downloads the upstream feed. Holds no state besides the HTTP client's connection pool.
pub struct Fetcher {
    url: Url,
    http_client: reqwest::Client,
}

impl Fetcher {
    pub fn new(url: Url) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("podfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("could not create an HTTP client")?;

        Ok(Self { url, http_client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch(&self) -> Result<String, FetchError> {
        debug!("Fetching `{}`", self.url);

        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })
    }
}
