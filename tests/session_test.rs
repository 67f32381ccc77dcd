use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use routefinder::api::Backend;
use routefinder::catalog::{Catalog, CATALOG_LOAD_FAILED};
use routefinder::error::FlightError;
use routefinder::model::{FlightLeg, Itinerary, RankBy, SearchCriteria, SearchRequest};
use routefinder::session::{Phase, SearchSession, SEARCH_FAILED};

#[derive(Clone, Default)]
struct FakeBackend {
    legs: Option<Vec<FlightLeg>>,
    results: Option<Vec<Itinerary>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl FakeBackend {
    fn answering(results: Vec<Itinerary>) -> Self {
        Self {
            results: Some(results),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Backend for FakeBackend {
    async fn flights(&self) -> Result<Vec<FlightLeg>, FlightError> {
        self.legs.clone().ok_or(FlightError::HttpStatus(503))
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Itinerary>, FlightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .clone()
            .ok_or_else(|| FlightError::ConnectionFailed("connection refused".into()))
    }
}

fn itinerary(stops: &[&str], total_time: u32, total_cost: f64) -> Itinerary {
    Itinerary {
        stops: stops.iter().map(|s| s.to_string()).collect(),
        total_time,
        total_cost,
    }
}

fn ranked_results() -> Vec<Itinerary> {
    vec![
        itinerary(&["NYC", "CHI", "LAX"], 400, 350.0),
        itinerary(&["NYC", "LAX"], 330, 400.0),
        itinerary(&["NYC", "DEN", "LAX"], 380, 420.0),
    ]
}

#[tokio::test]
async fn missing_origin_never_hits_backend() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    let err = session
        .submit(SearchCriteria::new("", "LAX", RankBy::Cost))
        .await
        .unwrap_err();

    assert!(matches!(err, FlightError::MissingCities));
    assert_eq!(backend.calls(), 0);
    assert_eq!(session.state().phase(), Phase::Idle);
    assert_eq!(
        session.state().error_message(),
        Some("Please select both origin and destination cities")
    );
}

#[tokio::test]
async fn missing_destination_never_hits_backend() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    let err = session
        .submit(SearchCriteria::new("NYC", "", RankBy::Time))
        .await
        .unwrap_err();

    assert!(matches!(err, FlightError::MissingCities));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn same_city_never_hits_backend() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    let err = session
        .submit(SearchCriteria::new("NYC", "NYC", RankBy::Cost))
        .await
        .unwrap_err();

    assert!(matches!(err, FlightError::SameCity));
    assert_eq!(backend.calls(), 0);
    assert_eq!(
        session.state().error_message(),
        Some("Origin and destination cannot be the same")
    );
}

#[tokio::test]
async fn success_keeps_backend_order() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    let returned = session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await
        .unwrap()
        .to_vec();

    assert_eq!(returned, ranked_results());
    assert_eq!(session.state().phase(), Phase::Success);
    assert_eq!(session.state().itineraries(), ranked_results().as_slice());
    assert!(session.state().error_message().is_none());
    assert!(session.state().can_submit());
}

#[tokio::test]
async fn empty_result_is_still_success() {
    let mut session = SearchSession::new(FakeBackend::answering(Vec::new()));

    let returned = session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await
        .unwrap();

    assert!(returned.is_empty());
    assert_eq!(session.state().phase(), Phase::Success);
    assert!(session.state().error_message().is_none());
}

#[tokio::test]
async fn request_carries_sort_code() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Time))
        .await
        .unwrap();
    session
        .submit(SearchCriteria::new("LAX", "NYC", RankBy::default()))
        .await
        .unwrap();

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].sort_by.code(), "T");
    assert_eq!(requests[0].origin, "NYC");
    assert_eq!(requests[1].sort_by.code(), "C");
    assert_eq!(requests[1].destination, "NYC");
}

#[tokio::test]
async fn failure_leaves_no_results_and_generic_message() {
    let mut session = SearchSession::new(FakeBackend::failing());

    let err = session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await
        .unwrap_err();

    assert!(matches!(err, FlightError::ConnectionFailed(_)));
    assert_eq!(session.state().phase(), Phase::Error);
    assert!(session.state().itineraries().is_empty());
    assert_eq!(session.state().error_message(), Some(SEARCH_FAILED));
    assert!(session.state().can_submit());
}

#[tokio::test]
async fn new_search_clears_previous_error() {
    let mut session = SearchSession::new(FakeBackend::failing());
    let _ = session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await;
    assert_eq!(session.state().phase(), Phase::Error);

    let ticket = session
        .begin(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .unwrap();
    assert_eq!(session.state().phase(), Phase::Loading);
    assert!(session.state().error_message().is_none());
    assert!(!session.state().can_submit());

    assert!(session.complete(ticket, ranked_results()));
    assert_eq!(session.state().phase(), Phase::Success);
}

#[tokio::test]
async fn new_search_clears_previous_results() {
    let mut session = SearchSession::new(FakeBackend::answering(ranked_results()));
    session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await
        .unwrap();

    let ticket = session
        .begin(SearchCriteria::new("LAX", "NYC", RankBy::Time))
        .unwrap();
    assert!(session.state().itineraries().is_empty());

    assert!(session.fail(ticket, &FlightError::HttpStatus(500)));
    assert!(session.state().itineraries().is_empty());
    assert_eq!(session.state().error_message(), Some(SEARCH_FAILED));
}

#[tokio::test]
async fn validation_after_success_drops_results_but_keeps_phase() {
    let mut session = SearchSession::new(FakeBackend::answering(ranked_results()));
    session
        .submit(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .await
        .unwrap();

    let _ = session
        .submit(SearchCriteria::new("LAX", "LAX", RankBy::Cost))
        .await;

    assert_eq!(session.state().phase(), Phase::Success);
    assert!(session.state().itineraries().is_empty());
    assert_eq!(
        session.state().error_message(),
        Some("Origin and destination cannot be the same")
    );
    assert_eq!(session.state().criteria().origin, "LAX");
}

#[test]
fn superseded_ticket_is_discarded() {
    let mut session = SearchSession::new(FakeBackend::failing());

    let first = session
        .begin(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .unwrap();
    let second = session
        .begin(SearchCriteria::new("NYC", "CHI", RankBy::Time))
        .unwrap();

    assert!(!session.is_current(first));
    assert!(session.is_current(second));

    // The older response arrives last but must not win.
    assert!(session.complete(second, vec![itinerary(&["NYC", "CHI"], 120, 150.0)]));
    assert!(!session.complete(first, ranked_results()));
    assert_eq!(session.state().itineraries().len(), 1);
    assert_eq!(session.state().itineraries()[0].stops, vec!["NYC", "CHI"]);

    assert!(!session.fail(first, &FlightError::Timeout));
    assert_eq!(session.state().phase(), Phase::Success);
}

#[test]
fn clear_returns_to_idle_and_invalidates_ticket() {
    let mut session = SearchSession::new(FakeBackend::failing());
    let ticket = session
        .begin(SearchCriteria::new("NYC", "LAX", RankBy::Cost))
        .unwrap();

    session.clear();
    assert_eq!(session.state().phase(), Phase::Idle);
    assert_eq!(session.state().criteria().destination, "LAX");

    assert!(!session.complete(ticket, ranked_results()));
    assert_eq!(session.state().phase(), Phase::Idle);
    assert!(session.state().itineraries().is_empty());
}

#[test]
fn set_criteria_does_not_submit() {
    let backend = FakeBackend::answering(ranked_results());
    let mut session = SearchSession::new(backend.clone());

    session.set_criteria(SearchCriteria::new("NYC", "LAX", RankBy::Time));

    assert_eq!(session.state().criteria().rank_by, RankBy::Time);
    assert_eq!(session.state().phase(), Phase::Idle);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn catalog_failure_is_terminal_and_empty() {
    let catalog = Catalog::load(&FakeBackend::failing()).await;

    assert!(!catalog.is_loaded());
    assert!(catalog.legs().is_empty());
    assert!(catalog.cities().is_empty());
    assert_eq!(catalog.error_message(), Some(CATALOG_LOAD_FAILED));
}

#[tokio::test]
async fn catalog_load_derives_cities() {
    let backend = FakeBackend {
        legs: Some(vec![
            FlightLeg {
                origin: "NYC".into(),
                destination: "LAX".into(),
                duration_minutes: 330,
                cost: 400.0,
            },
            FlightLeg {
                origin: "LAX".into(),
                destination: "CHI".into(),
                duration_minutes: 240,
                cost: 180.0,
            },
        ]),
        ..Default::default()
    };

    let catalog = Catalog::load(&backend).await;

    assert!(catalog.is_loaded());
    assert_eq!(catalog.legs().len(), 2);
    assert_eq!(catalog.cities(), ["CHI", "LAX", "NYC"]);
}
