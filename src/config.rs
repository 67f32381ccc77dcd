use crate::error::FlightError;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
pub const DEFAULT_API_BASE: &str = "/api";

/// Where the route service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: String,
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: 30,
            proxy: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), FlightError> {
        if !self.server.starts_with("http://") && !self.server.starts_with("https://") {
            return Err(FlightError::InvalidConfig(format!(
                "server \"{}\" must start with http:// or https://",
                self.server
            )));
        }
        if !self.api_base.starts_with('/') {
            return Err(FlightError::InvalidConfig(format!(
                "api base \"{}\" must start with /",
                self.api_base
            )));
        }
        if self.timeout == 0 {
            return Err(FlightError::InvalidConfig(
                "timeout must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.server.trim_end_matches('/'),
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn flights_url(&self) -> String {
        self.endpoint("flights")
    }

    pub fn search_url(&self) -> String {
        self.endpoint("search")
    }
}
