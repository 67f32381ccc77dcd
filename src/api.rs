use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use wreq::Client;

use crate::config::ClientConfig;
use crate::error::{self, FlightError};
use crate::model::{FlightLeg, Itinerary, SearchRequest};

/// The two endpoints of the route service.
///
/// Ranking happens behind `search`; callers must keep the returned order.
pub trait Backend {
    fn flights(&self) -> impl Future<Output = Result<Vec<FlightLeg>, FlightError>> + Send;

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Itinerary>, FlightError>> + Send;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, FlightError> {
        config.validate()?;

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout));

        if let Some(ref proxy) = config.proxy {
            let proxy =
                wreq::Proxy::all(proxy).map_err(|e| FlightError::ProxyError(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(error::from_http_error)?;
        Ok(Self { client, config })
    }
}

fn check_status(status: u16) -> Result<(), FlightError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FlightError::HttpStatus(status))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FlightError> {
    serde_json::from_str(body).map_err(|e| FlightError::Decode(e.to_string()))
}

impl Backend for HttpBackend {
    async fn flights(&self) -> Result<Vec<FlightLeg>, FlightError> {
        let url = self.config.flights_url();
        tracing::debug!(%url, "requesting flight catalog");

        let response = self
            .client
            .get(url.as_str())
            .header("accept", "application/json")
            .send()
            .await
            .map_err(error::from_http_error)?;

        check_status(response.status().as_u16())?;
        let body = response.text().await.map_err(error::from_http_error)?;
        decode(&body)
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Itinerary>, FlightError> {
        let url = self.config.search_url();
        let payload =
            serde_json::to_vec(request).map_err(|e| FlightError::Encode(e.to_string()))?;
        tracing::debug!(%url, sort_by = request.sort_by.code(), "posting route search");

        let response = self
            .client
            .post(url.as_str())
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(error::from_http_error)?;

        check_status(response.status().as_u16())?;
        let body = response.text().await.map_err(error::from_http_error)?;
        decode(&body)
    }
}
