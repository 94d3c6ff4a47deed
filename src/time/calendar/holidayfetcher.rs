use std::time::Duration;

use http::{
    Request,
    Uri
};
use http_body_util::BodyExt;
use hyper_rustls::{
    HttpsConnector,
    HttpsConnectorBuilder
};
use hyper_util::client::legacy::{
    connect::HttpConnector,
    Client
};
use hyper_util::rt::TokioExecutor;
use log::debug;

use crate::time::calendar::holidaydata::HolidayData;
use crate::time::calendar::registryerror::RegistryError;

pub const DEFAULT_HOLIDAY_URL: &str = "https://cdn.jsdelivr.net/npm/chinese-days/dist/chinese-days.json";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

type HttpsClient = Client<HttpsConnector<HttpConnector>, String>;

/// Downloads the holiday dataset with a single GET.
///
/// Plain `http://` urls are accepted too so a local mock server can stand in
/// for the CDN.
#[derive(Clone, Debug)]
pub struct HolidayFetcher {
    client: HttpsClient,
    uri: Uri,
    timeout: Duration
}

impl HolidayFetcher {
    pub fn new(url: &str, timeout: Duration) -> Result<HolidayFetcher, RegistryError> {
        let uri: Uri = url
            .parse()
            .map_err(|_| RegistryError::InvalidUrl(url.to_owned()))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(RegistryError::InvalidUrl(url.to_owned()));
        }

        let https_connector = HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(RegistryError::Tls)?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https_connector);

        Ok(HolidayFetcher { client, uri, timeout })
    }

    pub fn url(&self) -> String {
        self.uri.to_string()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self) -> Result<HolidayData, RegistryError> {
        match tokio::time::timeout(self.timeout, self.fetch_inner()).await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::Timeout(self.timeout.as_secs()))
        }
    }

    async fn fetch_inner(&self) -> Result<HolidayData, RegistryError> {
        debug!("GET {}", self.uri);
        let request = Request::get(self.uri.clone())
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::USER_AGENT, concat!("timeworkday/", env!("CARGO_PKG_VERSION")))
            .body(String::new())
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?
            .to_bytes();
        debug!("received {} bytes of holiday data", body.len());

        HolidayData::from_slice(&body)
    }
}
