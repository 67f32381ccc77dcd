use std::collections::BTreeSet;

use crate::api::Backend;
use crate::model::{City, FlightLeg};

pub const CATALOG_LOAD_FAILED: &str = "Failed to load flight data. Please try again later.";

/// Every origin and destination in `legs`, deduplicated and sorted.
pub fn derive_cities(legs: &[FlightLeg]) -> Vec<City> {
    legs.iter()
        .flat_map(|leg| [leg.origin.as_str(), leg.destination.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// The flight catalog and the city list derived from it.
///
/// Loaded once per client lifetime. A failed load is terminal: the catalog stays
/// empty and `error_message` explains why, there is no retry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    legs: Vec<FlightLeg>,
    cities: Vec<City>,
    error_message: Option<String>,
}

impl Catalog {
    pub async fn load<B: Backend>(backend: &B) -> Self {
        tracing::debug!("loading flight catalog");
        match backend.flights().await {
            Ok(legs) => {
                let catalog = Self::from_legs(legs);
                tracing::info!(
                    legs = catalog.legs.len(),
                    cities = catalog.cities.len(),
                    "flight catalog loaded"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(error = %e, "flight catalog load failed");
                Self {
                    error_message: Some(CATALOG_LOAD_FAILED.to_string()),
                    ..Self::default()
                }
            }
        }
    }

    pub fn from_legs(legs: Vec<FlightLeg>) -> Self {
        let cities = derive_cities(&legs);
        Self {
            legs,
            cities,
            error_message: None,
        }
    }

    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.error_message.is_none()
    }
}
