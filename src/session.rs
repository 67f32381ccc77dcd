use crate::api::Backend;
use crate::error::FlightError;
use crate::model::{Itinerary, SearchCriteria, SearchRequest};

pub const SEARCH_FAILED: &str = "Failed to search flights. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Gate run before any search request is sent.
pub fn validate(criteria: &SearchCriteria) -> Result<(), FlightError> {
    if criteria.origin.is_empty() || criteria.destination.is_empty() {
        return Err(FlightError::MissingCities);
    }
    if criteria.origin == criteria.destination {
        return Err(FlightError::SameCity);
    }
    Ok(())
}

/// What a renderer needs to draw the search half of the client.
///
/// At most one of `itineraries` (non-empty) and `error_message` is set.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: Phase,
    criteria: SearchCriteria,
    itineraries: Vec<Itinerary>,
    error_message: Option<String>,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The submit control is disabled while a request is outstanding.
    pub fn can_submit(&self) -> bool {
        self.phase != Phase::Loading
    }
}

/// Handle for one in-flight search. Only the newest ticket can land a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    generation: u64,
}

/// Owns the session state and the request lifecycle for one client.
pub struct SearchSession<B> {
    backend: B,
    state: SessionState,
    generation: u64,
}

impl<B: Backend> SearchSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::default(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mirror form input without submitting.
    pub fn set_criteria(&mut self, criteria: SearchCriteria) {
        self.state.criteria = criteria;
    }

    /// Validate `criteria` and enter LOADING.
    ///
    /// A rejected submission records the message and drops stale results but leaves
    /// the phase alone. An accepted one supersedes any ticket still outstanding.
    pub fn begin(&mut self, criteria: SearchCriteria) -> Result<Ticket, FlightError> {
        self.state.criteria = criteria;

        if let Err(e) = validate(&self.state.criteria) {
            tracing::debug!(error = %e, "search rejected by validation");
            self.state.itineraries.clear();
            self.state.error_message = Some(e.to_string());
            return Err(e);
        }

        self.generation += 1;
        self.state.phase = Phase::Loading;
        self.state.error_message = None;
        self.state.itineraries.clear();

        tracing::info!(
            origin = %self.state.criteria.origin,
            destination = %self.state.criteria.destination,
            sort_by = self.state.criteria.rank_by.code(),
            generation = self.generation,
            "route search submitted"
        );

        Ok(Ticket {
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && self.state.phase == Phase::Loading
    }

    /// Land a successful response. Returns `false` if `ticket` was superseded.
    pub fn complete(&mut self, ticket: Ticket, itineraries: Vec<Itinerary>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "discarding stale search response");
            return false;
        }

        tracing::info!(
            generation = ticket.generation,
            itineraries = itineraries.len(),
            "route search completed"
        );
        self.state.phase = Phase::Success;
        self.state.error_message = None;
        self.state.itineraries = itineraries;
        true
    }

    /// Land a failed response. Returns `false` if `ticket` was superseded.
    pub fn fail(&mut self, ticket: Ticket, err: &FlightError) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "discarding stale search failure");
            return false;
        }

        tracing::warn!(generation = ticket.generation, error = %err, "route search failed");
        self.state.phase = Phase::Error;
        self.state.itineraries.clear();
        self.state.error_message = Some(SEARCH_FAILED.to_string());
        true
    }

    /// Validate, send and land one search.
    ///
    /// Itineraries come back in the order the backend ranked them.
    pub async fn submit(&mut self, criteria: SearchCriteria) -> Result<&[Itinerary], FlightError> {
        let ticket = self.begin(criteria)?;
        let request = SearchRequest::from(&self.state.criteria);

        match self.backend.search(&request).await {
            Ok(itineraries) => {
                self.complete(ticket, itineraries);
                Ok(&self.state.itineraries)
            }
            Err(e) => {
                self.fail(ticket, &e);
                Err(e)
            }
        }
    }

    /// Back to IDLE. Keeps the criteria; any outstanding ticket goes stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state.phase = Phase::Idle;
        self.state.itineraries.clear();
        self.state.error_message = None;
    }
}
