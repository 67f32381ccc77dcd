use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::HttpBackend;
use crate::catalog::Catalog;
use crate::config::ClientConfig;
use crate::model::{City, Itinerary, RankBy, SearchCriteria};
use crate::session::SearchSession;
use crate::table;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchArgs {
    #[schemars(description = "Origin city, exactly as listed by list_cities. Example: NYC")]
    origin: String,
    #[schemars(description = "Destination city, exactly as listed by list_cities. Example: LAX")]
    destination: String,
    #[schemars(description = "Ranking criterion: cost or time. Default: cost")]
    rank_by: Option<String>,
    #[schemars(description = "Return only the N best-ranked routes")]
    top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RankedRoute<'a> {
    rank: usize,
    cities: &'a [City],
    route: String,
    total_time: u32,
    duration: String,
    total_cost: f64,
    cost: String,
}

fn ranked(itineraries: &[Itinerary], top: Option<usize>) -> Vec<RankedRoute<'_>> {
    itineraries
        .iter()
        .take(top.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, it)| RankedRoute {
            rank: i + 1,
            cities: &it.stops,
            route: table::format_route(&it.stops),
            total_time: it.total_time,
            duration: table::format_duration(it.total_time),
            total_cost: it.total_cost,
            cost: table::format_cost(it.total_cost),
        })
        .collect()
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[derive(Clone)]
struct RouteMcp {
    catalog: Arc<Catalog>,
    session: Arc<Mutex<SearchSession<HttpBackend>>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RouteMcp {
    fn new(catalog: Catalog, backend: HttpBackend) -> Self {
        Self {
            catalog: Arc::new(catalog),
            session: Arc::new(Mutex::new(SearchSession::new(backend))),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List every city served by the flight catalog, sorted. Use these exact names as origin and destination for search_routes."
    )]
    async fn list_cities(&self) -> Result<CallToolResult, McpError> {
        if let Some(msg) = self.catalog.error_message() {
            return tool_error(msg);
        }
        to_json(&self.catalog.cities())
    }

    #[tool(
        description = "List every direct flight leg in the catalog as JSON objects with from, to, time (minutes) and cost."
    )]
    async fn list_flights(&self) -> Result<CallToolResult, McpError> {
        if let Some(msg) = self.catalog.error_message() {
            return tool_error(msg);
        }
        to_json(&self.catalog.legs())
    }

    #[tool(
        description = "Search ranked routes between two cities. Routes come back best first by the chosen criterion (cost or time), each with its stops, total time and total cost."
    )]
    async fn search_routes(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let rank_by = match args.rank_by.as_deref().map(RankBy::from_str_loose).transpose() {
            Ok(r) => r.unwrap_or_default(),
            Err(e) => return tool_error(e.to_string()),
        };

        let criteria = SearchCriteria::new(args.origin.trim(), args.destination.trim(), rank_by);
        let mut session = self.session.lock().await;
        let outcome = session.submit(criteria).await;

        match outcome {
            Ok(itineraries) => to_json(&ranked(itineraries, args.top)),
            Err(e) if e.is_validation() => tool_error(e.to_string()),
            Err(_) => tool_error(
                session
                    .state()
                    .error_message()
                    .unwrap_or(crate::session::SEARCH_FAILED),
            ),
        }
    }
}

#[tool_handler]
impl ServerHandler for RouteMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "routefinder".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Flight route search. Workflow: (1) list_cities to see valid city names. (2) search_routes with an origin, a destination and rank_by cost or time. Results are already ranked; do not re-sort them.".into(),
            ),
        }
    }
}

pub async fn run(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(config)?;
    let catalog = Catalog::load(&backend).await;

    let service = RouteMcp::new(catalog, backend)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}
