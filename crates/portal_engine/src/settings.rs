use std::time::Duration;

/// Paths of the backend endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Personalized matches for the signed-in user.
    pub matches: String,
    pub search: String,
    /// Unfiltered listing used as the fallback.
    pub public_listing: String,
    pub filter_options: String,
    pub my_applications: String,
    /// The job id is appended as the last path segment.
    pub apply: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            matches: "/api/jobs/search-with-matching".to_string(),
            search: "/api/jobs/search".to_string(),
            public_listing: "/api/jobs/public".to_string(),
            filter_options: "/api/jobs/filter-options".to_string(),
            my_applications: "/api/applications/me".to_string(),
            apply: "/api/applications/apply".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub endpoints: Endpoints,
    pub connect_timeout: Duration,
    /// Whole-request timeout; expiry is treated like any other failure.
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
    /// Keep session cookies between requests.
    pub cookie_store: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoints: Endpoints::default(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            max_body_bytes: 2 * 1024 * 1024,
            cookie_store: true,
        }
    }
}
