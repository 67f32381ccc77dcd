use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use routefinder::catalog::Catalog;
use routefinder::config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_SERVER};
use routefinder::error::FlightError;
use routefinder::model::{Itinerary, RankBy, SearchCriteria};
use routefinder::session::SEARCH_FAILED;
use routefinder::table;

#[derive(Parser)]
#[command(
    name = "routefinder",
    about = "Search ranked flight routes from the terminal",
    version,
    after_help = "\
Examples:
  routefinder cities
  routefinder flights --json --pretty
  routefinder search -f NYC -t LAX
  routefinder search -f NYC -t LAX --rank time --top 3
  routefinder --server https://routes.example.com search -f NYC -t LAX --compact"
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ServerArgs {
    #[arg(
        long,
        global = true,
        env = "ROUTEFINDER_SERVER",
        default_value = DEFAULT_SERVER,
        value_name = "URL",
        help = "Route service origin"
    )]
    server: String,

    #[arg(
        long,
        global = true,
        env = "ROUTEFINDER_API_BASE",
        default_value = DEFAULT_API_BASE,
        value_name = "PATH",
        help = "API base path on the route service"
    )]
    api_base: String,

    #[arg(
        long,
        global = true,
        env = "ROUTEFINDER_TIMEOUT",
        default_value = "30",
        value_name = "SECS",
        help = "Request timeout"
    )]
    timeout: u64,

    #[arg(
        long,
        global = true,
        env = "ROUTEFINDER_PROXY",
        value_name = "URL",
        help = "HTTP or SOCKS5 proxy"
    )]
    proxy: Option<String>,
}

impl ServerArgs {
    fn to_config(&self) -> ClientConfig {
        ClientConfig {
            server: self.server.clone(),
            api_base: self.api_base.clone(),
            timeout: self.timeout,
            proxy: self.proxy.clone(),
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(about = "List every direct flight in the catalog")]
    Flights(ListArgs),
    #[command(about = "List every city reachable in the catalog")]
    Cities(ListArgs),
    #[command(
        about = "Search ranked routes between two cities",
        long_about = "Search ranked routes between two cities.\n\
            Routes are ranked by the route service, best first, by cost or by time.",
        after_help = "\
Examples:
  Cheapest:     routefinder search -f NYC -t LAX
  Fastest:      routefinder search -f NYC -t LAX --rank time
  JSON output:  routefinder search -f NYC -t LAX --json --pretty
  Top 3:        routefinder search -f NYC -t LAX --top 3 --compact"
    )]
    Search(SearchArgs),
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp,
}

#[derive(clap::Args)]
struct ListArgs {
    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(short, long, value_name = "CITY", help = "Origin city")]
    from: Option<String>,

    #[arg(short, long, value_name = "CITY", help = "Destination city")]
    to: Option<String>,

    #[arg(
        long,
        default_value = "cost",
        value_name = "CRITERION",
        help = "Rank routes by [cost, time]"
    )]
    rank: String,

    #[arg(long, value_name = "N", help = "Show only the N best-ranked routes")]
    top: Option<usize>,

    #[arg(long, help = "One-line-per-route output")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

fn error_code(err: &FlightError) -> i32 {
    match err {
        FlightError::MissingCities
        | FlightError::SameCity
        | FlightError::InvalidConfig(_)
        | FlightError::Validation(_) => 2,
        FlightError::Timeout
        | FlightError::ConnectionFailed(_)
        | FlightError::DnsResolution(_)
        | FlightError::TlsError(_)
        | FlightError::ProxyError(_) => 3,
        FlightError::HttpStatus(_) => 5,
        FlightError::Encode(_) | FlightError::Decode(_) => 6,
    }
}

fn error_kind(err: &FlightError) -> &'static str {
    match err {
        FlightError::MissingCities => "missing_cities",
        FlightError::SameCity => "same_city",
        FlightError::InvalidConfig(_) => "invalid_config",
        FlightError::Validation(_) => "validation_error",
        FlightError::Timeout => "timeout",
        FlightError::ConnectionFailed(_) => "connection_failed",
        FlightError::DnsResolution(_) => "dns_error",
        FlightError::TlsError(_) => "tls_error",
        FlightError::ProxyError(_) => "proxy_error",
        FlightError::HttpStatus(_) => "http_error",
        FlightError::Encode(_) => "encode_error",
        FlightError::Decode(_) => "decode_error",
    }
}

fn exit_with(kind: &str, message: &str, code: i32, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": kind,
                "message": message,
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {message}");
    }
    process::exit(code);
}

fn die(err: &FlightError, json_mode: bool) -> ! {
    exit_with(error_kind(err), &err.to_string(), error_code(err), json_mode)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match output {
        Ok(s) => println!("{s}"),
        Err(e) => die(&FlightError::Decode(e.to_string()), true),
    }
}

async fn load_catalog(config: ClientConfig, json_mode: bool) -> Catalog {
    let catalog = match routefinder::load_catalog(config).await {
        Ok(c) => c,
        Err(e) => die(&e, json_mode),
    };
    if let Some(msg) = catalog.error_message() {
        exit_with("catalog_load_failed", msg, 3, json_mode);
    }
    catalog
}

fn print_routes(itineraries: &[Itinerary], args: &SearchArgs) {
    if args.json || args.pretty {
        print_json(&itineraries, args.pretty);
    } else if itineraries.is_empty() {
        println!("No routes found.");
    } else if args.compact {
        for line in table::compact_lines(itineraries) {
            println!("{line}");
        }
    } else {
        println!("{}", table::render_itineraries(itineraries));
    }
}

async fn run_search(config: ClientConfig, args: SearchArgs) {
    let json_mode = args.json || args.pretty;

    let rank_by = match RankBy::from_str_loose(&args.rank) {
        Ok(r) => r,
        Err(e) => die(&e, json_mode),
    };

    let criteria = SearchCriteria::new(
        args.from.as_deref().unwrap_or_default().trim(),
        args.to.as_deref().unwrap_or_default().trim(),
        rank_by,
    );

    match routefinder::search_routes(criteria, config).await {
        Ok(mut itineraries) => {
            if let Some(n) = args.top {
                itineraries.truncate(n);
            }
            print_routes(&itineraries, &args);
        }
        // Local misconfiguration: show the real cause.
        Err(e) if e.is_validation() || matches!(e, FlightError::ProxyError(_)) => {
            die(&e, json_mode)
        }
        Err(e) => exit_with(error_kind(&e), SEARCH_FAILED, error_code(&e), json_mode),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.server.to_config();

    match cli.command {
        Commands::Mcp => {
            if let Err(e) = routefinder::mcp::run(config).await {
                eprintln!("error: MCP server failed: {e}");
                process::exit(1);
            }
        }
        Commands::Flights(args) => {
            let json_mode = args.json || args.pretty;
            let catalog = load_catalog(config, json_mode).await;
            if json_mode {
                print_json(&catalog.legs(), args.pretty);
            } else if catalog.legs().is_empty() {
                println!("No flights in catalog.");
            } else {
                println!("{}", table::render_catalog(catalog.legs()));
            }
        }
        Commands::Cities(args) => {
            let json_mode = args.json || args.pretty;
            let catalog = load_catalog(config, json_mode).await;
            if json_mode {
                print_json(&catalog.cities(), args.pretty);
            } else {
                for city in catalog.cities() {
                    println!("{city}");
                }
            }
        }
        Commands::Search(args) => run_search(config, args).await,
    }
}
