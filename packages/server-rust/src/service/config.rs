use std::collections::BTreeMap;
use std::time::Duration;

use lumen_core::{ApiInfo, API_VERSION};

/// API-level configuration: identity reported by the info endpoint, the
/// route prefix, and logging thresholds.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Human-readable API name.
    pub name: String,
    /// Version string stamped into every envelope's metadata.
    pub version: String,
    /// One-line description returned by the info endpoint.
    pub description: String,
    /// Path prefix all endpoints are mounted under. Empty mounts at `/`.
    pub prefix: String,
    /// Requests slower than this emit an additional warning record.
    pub slow_request_threshold: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            name: "Lumen API".to_string(),
            version: API_VERSION.to_string(),
            description: "RESTful API with standardized response format".to_string(),
            prefix: "/api".to_string(),
            slow_request_threshold: Duration::from_millis(1000),
        }
    }
}

const FEATURES: [&str; 6] = [
    "Standardized response format",
    "Request tracking with IDs",
    "Execution time monitoring",
    "Error handling with structured errors",
    "Request/response logging",
    "Performance monitoring",
];

impl ApiConfig {
    fn trimmed_prefix(&self) -> &str {
        self.prefix.trim_end_matches('/')
    }

    /// Full route path for an endpoint suffix such as `"/hello"`.
    #[must_use]
    pub fn path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.trimmed_prefix())
    }

    /// Route path of the API info endpoint.
    #[must_use]
    pub fn root_path(&self) -> String {
        let prefix = self.trimmed_prefix();
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }
    }

    /// `METHOD path` listing returned with not-found errors.
    #[must_use]
    pub fn available_endpoints(&self) -> Vec<String> {
        vec![
            format!("GET {}", self.path("/hello")),
            format!("GET {}", self.path("/health")),
            format!("GET {}", self.root_path()),
            format!("POST {}", self.path("/echo")),
        ]
    }

    /// Payload of the API info endpoint.
    #[must_use]
    pub fn api_info(&self) -> ApiInfo {
        let endpoints = BTreeMap::from([
            ("/hello".to_string(), "Returns greeting message".to_string()),
            ("/health".to_string(), "Health check endpoint".to_string()),
            ("/".to_string(), "API information".to_string()),
            (
                "/echo".to_string(),
                "POST endpoint that echoes back JSON data".to_string(),
            ),
        ]);

        ApiInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            endpoints,
            features: FEATURES.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.prefix, "/api");
        assert_eq!(config.slow_request_threshold, Duration::from_millis(1000));
    }

    #[test]
    fn paths_ignore_trailing_slash_in_prefix() {
        let config = ApiConfig {
            prefix: "/api/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.path("/hello"), "/api/hello");
        assert_eq!(config.root_path(), "/api");
    }

    #[test]
    fn empty_prefix_mounts_at_root() {
        let config = ApiConfig {
            prefix: String::new(),
            ..ApiConfig::default()
        };
        assert_eq!(config.path("/echo"), "/echo");
        assert_eq!(config.root_path(), "/");
    }

    #[test]
    fn available_endpoints_lists_four_routes() {
        let endpoints = ApiConfig::default().available_endpoints();
        assert_eq!(
            endpoints,
            vec![
                "GET /api/hello",
                "GET /api/health",
                "GET /api",
                "POST /api/echo",
            ]
        );
    }

    #[test]
    fn api_info_describes_every_endpoint() {
        let info = ApiConfig::default().api_info();
        assert_eq!(info.name, "Lumen API");
        assert_eq!(info.endpoints.len(), 4);
        assert_eq!(info.features.len(), FEATURES.len());
    }
}
