use crate::feed::RawFeed;
use crate::fetch::{FeedSource, FetchError, FetchRequest};
use bon::bon;
use log::{info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Endpoint the weather dashboard backend listens on by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1337/api/weather";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches feeds by POSTing a [`FetchRequest`] as JSON to an HTTP endpoint.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use weather_profiles::{FeedSource, FetchRequest, HttpFeedSource};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpFeedSource::builder()
///     .endpoint("http://weather.internal:8080/api/weather")
///     .timeout(Duration::from_secs(5))
///     .build()?;
///
/// let raw = source.fetch(&FetchRequest::default()).await?;
/// println!("{} bytes", raw.as_str().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    endpoint: String,
    client: Client,
}

#[bon]
impl HttpFeedSource {
    /// Creates a source for `endpoint` (default [`DEFAULT_ENDPOINT`]) with a
    /// request timeout (default 30 seconds).
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<RawFeed, FetchError> {
        let url = self.endpoint.clone();
        info!(
            "Requesting feed from {} for {:?}..{:?}",
            url, request.start_date, request.end_date
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        let declared_xml = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("xml"));
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::ResponseBody(url.clone(), e))?;

        Ok(if declared_xml {
            RawFeed::Xml(body)
        } else {
            RawFeed::detect(body)
        })
    }
}
