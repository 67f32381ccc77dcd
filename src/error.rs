use std::fmt;

#[derive(Debug)]
pub enum FlightError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    TlsError(String),
    HttpStatus(u16),
    Encode(String),
    Decode(String),
    MissingCities,
    SameCity,
    InvalidConfig(String),
    Validation(String),
}

impl fmt::Display for FlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out. The route service may be slow or unreachable; \
                 try increasing --timeout"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection to the route service failed ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host}. Check --server"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error. Check your --proxy URL is correct ({detail})"
            ),
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error talking to the route service ({detail})"
            ),
            Self::HttpStatus(status) => write!(
                f,
                "unexpected HTTP status {status} from the route service"
            ),
            Self::Encode(detail) => write!(
                f,
                "failed to encode route search request: {detail}"
            ),
            Self::Decode(detail) => write!(
                f,
                "failed to decode route service response: {detail}"
            ),
            Self::MissingCities => write!(f, "Please select both origin and destination cities"),
            Self::SameCity => write!(f, "Origin and destination cannot be the same"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FlightError {}

impl FlightError {
    /// Rejections raised before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCities | Self::SameCity | Self::InvalidConfig(_) | Self::Validation(_)
        )
    }
}

pub fn from_http_error(err: wreq::Error) -> FlightError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return FlightError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return FlightError::DnsResolution(msg);
        }
        return FlightError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return FlightError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return FlightError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return FlightError::ProxyError(msg);
    }

    FlightError::ConnectionFailed(msg)
}
