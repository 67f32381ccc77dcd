pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mcp;
pub mod model;
pub mod session;
pub mod table;

use api::HttpBackend;
use catalog::Catalog;
use config::ClientConfig;
use error::FlightError;
use model::{Itinerary, SearchCriteria};
use session::SearchSession;

/// Fetch the flight catalog once. Transport failures are folded into
/// `Catalog::error_message`; only a bad `config` is an `Err`.
pub async fn load_catalog(config: ClientConfig) -> Result<Catalog, FlightError> {
    let backend = HttpBackend::new(config)?;
    Ok(Catalog::load(&backend).await)
}

/// Validate and run a single search, returning the ranked itineraries.
///
/// Rejected criteria never reach the network.
pub async fn search_routes(
    criteria: SearchCriteria,
    config: ClientConfig,
) -> Result<Vec<Itinerary>, FlightError> {
    let mut session = SearchSession::new(HttpBackend::new(config)?);
    let itineraries = session.submit(criteria).await?.to_vec();
    Ok(itineraries)
}
