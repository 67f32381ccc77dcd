use serde::{Deserialize, Serialize};

/// City identifier as served by the backend. Case-sensitive.
pub type City = String;

/// One direct flight offering, as returned by `GET {api}/flights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    #[serde(rename = "from")]
    pub origin: City,
    #[serde(rename = "to")]
    pub destination: City,
    #[serde(rename = "time")]
    pub duration_minutes: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankBy {
    #[default]
    #[serde(rename = "C")]
    Cost,
    #[serde(rename = "T")]
    Time,
}

impl RankBy {
    pub fn from_str_loose(s: &str) -> Result<Self, crate::error::FlightError> {
        match s {
            "cost" | "C" | "c" => Ok(Self::Cost),
            "time" | "T" | "t" => Ok(Self::Time),
            _ => Err(crate::error::FlightError::Validation(format!(
                "invalid rank criterion: {s} (expected cost or time)"
            ))),
        }
    }

    /// Single-character code the search endpoint expects in `sortBy`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Cost => "C",
            Self::Time => "T",
        }
    }
}

/// Form input for a route search. Empty strings mean "not selected yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub origin: City,
    pub destination: City,
    pub rank_by: RankBy,
}

impl SearchCriteria {
    pub fn new(origin: impl Into<City>, destination: impl Into<City>, rank_by: RankBy) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            rank_by,
        }
    }
}

/// Body of `POST {api}/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub origin: City,
    pub destination: City,
    pub sort_by: RankBy,
}

impl From<&SearchCriteria> for SearchRequest {
    fn from(criteria: &SearchCriteria) -> Self {
        Self {
            origin: criteria.origin.clone(),
            destination: criteria.destination.clone(),
            sort_by: criteria.rank_by,
        }
    }
}

/// One ranked candidate route. `stops` starts at the origin and ends at the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(rename = "cities")]
    pub stops: Vec<City>,
    pub total_time: u32,
    pub total_cost: f64,
}
