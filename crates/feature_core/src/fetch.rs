use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    dispatch::ContainerWriter,
    error::{FetchError, OperationError},
    settings::Endpoints,
};

/// Performs one HTTP GET and hands back the body of a successful response.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: redacted(url),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: redacted(url),
                status: status.as_u16(),
            });
        }

        let body = res.bytes().await.map_err(|source| FetchError::Transport {
            url: redacted(url),
            source,
        })?;
        Ok(body.to_vec())
    }
}

/// Scheme, host and path only. Query strings may carry credentials.
pub fn redacted(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    )
}

/// Appends one percent-encoded path segment to `base`. Dot segments are
/// refused since the URL parser would resolve them against the base path.
pub fn with_segment(base: &str, segment: &str) -> Result<Url, OperationError> {
    if matches!(segment, "." | "..") {
        return Err(OperationError::InvalidSegment(segment.to_string()));
    }
    let mut url = parse_endpoint(base)?;
    url.path_segments_mut()
        .map_err(|_| OperationError::InvalidEndpoint {
            url: base.to_string(),
            reason: "cannot carry a path".into(),
        })?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Appends percent-encoded query pairs to `base`.
pub fn with_query(base: &str, pairs: &[(&str, &str)]) -> Result<Url, OperationError> {
    let mut url = parse_endpoint(base)?;
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url)
}

pub fn parse_endpoint(base: &str) -> Result<Url, OperationError> {
    Url::parse(base).map_err(|err| OperationError::InvalidEndpoint {
        url: base.to_string(),
        reason: err.to_string(),
    })
}

/// Network access for a single invocation. Every request first puts the
/// loading view into the feature's container.
pub struct Stage<'a> {
    fetcher: &'a dyn Fetcher,
    endpoints: &'a Endpoints,
    writer: &'a ContainerWriter<'a>,
}

impl<'a> Stage<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        endpoints: &'a Endpoints,
        writer: &'a ContainerWriter<'a>,
    ) -> Self {
        Self {
            fetcher,
            endpoints,
            writer,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.endpoints
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, OperationError> {
        self.writer.loading();
        debug!(
            feature = %self.writer.feature(),
            url = %redacted(&url),
            "fetching"
        );
        let body = self.fetcher.get(&url).await?;
        serde_json::from_slice(&body).map_err(|source| OperationError::Decode {
            url: redacted(&url),
            source,
        })
    }
}
