use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::ShortenError,
    request::{LinkSummary, ShortenRequest},
};

pub const LINK_PATH: &str = "/api/link";

/// The server side of the form.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LinkApi {
    /// Creates a link. Only success or failure is reported, the response body is ignored.
    async fn create_link(&self, request: &ShortenRequest) -> Result<(), ShortenError>;
}

/// [`LinkApi`] backed by a ShareOxide server over HTTP.
#[derive(Clone, Debug)]
pub struct HttpLinkApi {
    client: reqwest::Client,
    link_url: Url,
}

impl HttpLinkApi {
    pub fn new(client: reqwest::Client, base_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            link_url: base_url.join(LINK_PATH)?,
        })
    }

    pub fn link_url(&self) -> &Url {
        &self.link_url
    }

    /// Get all links the current session has access to
    #[instrument(skip(self), fields(url = %self.link_url))]
    pub async fn links(&self) -> Result<Vec<LinkSummary>, reqwest::Error> {
        self.client
            .get(self.link_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LinkApi for HttpLinkApi {
    #[instrument(skip(self, request), fields(url = %self.link_url))]
    async fn create_link(&self, request: &ShortenRequest) -> Result<(), ShortenError> {
        let response = self
            .client
            .post(self.link_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "link API responded");

        if !status.is_success() {
            return Err(ShortenError::Request { status });
        }

        Ok(())
    }
}
