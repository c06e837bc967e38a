//! Transport configuration for the file-hosting HTTP API.

use panel_host::{encode_query_component, SortDirection, SortKey, DEFAULT_API_BASE};
use serde::{Deserialize, Serialize};

/// Path of the CSRF token endpoint, relative to the API base.
pub const DEFAULT_CSRF_PATH: &str = "/csrf-token";
/// Request header carrying the CSRF token on non-GET calls.
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Where the API lives and how write calls are authorized.
pub struct ApiConfig {
    /// API prefix; absolute (`https://host/api`) or origin-relative (`/api`).
    pub base_url: String,
    /// CSRF token endpoint, relative to `base_url`.
    pub csrf_path: String,
    /// Header name the token is sent under.
    pub csrf_header: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            csrf_path: DEFAULT_CSRF_PATH.to_string(),
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
        }
    }
}

impl ApiConfig {
    /// Config rooted at `base_url` with the default CSRF settings.
    pub fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Parses a JSON config object; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid API config: {e}"))
    }

    /// Joins `route` onto the API base.
    pub fn endpoint(&self, route: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if route.starts_with('/') {
            format!("{base}{route}")
        } else {
            format!("{base}/{route}")
        }
    }

    /// CSRF token endpoint.
    pub fn csrf_url(&self) -> String {
        self.endpoint(&self.csrf_path)
    }

    /// Directory listing endpoint.
    pub fn list_url(&self, path: &str, sort: SortKey, direction: SortDirection) -> String {
        format!(
            "{}?path={}&sort={}&dir={}",
            self.endpoint("/files"),
            encode_query_component(path),
            sort.as_str(),
            direction.as_str()
        )
    }

    /// File metadata endpoint.
    pub fn metadata_url(&self, path: &str) -> String {
        format!(
            "{}?path={}",
            self.endpoint("/metadata"),
            encode_query_component(path)
        )
    }

    /// Direct download endpoint for one file.
    pub fn download_url(&self, path: &str) -> String {
        format!(
            "{}?path={}",
            self.endpoint("/files/download"),
            encode_query_component(path)
        )
    }

    /// Activity log page endpoint.
    pub fn logs_url(&self, limit: u32, offset: u32) -> String {
        format!("{}?limit={limit}&offset={offset}", self.endpoint("/logs"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_console_server() {
        let config = ApiConfig::default();
        assert_eq!(config.csrf_url(), "/api/csrf-token");
        assert_eq!(config.csrf_header, "X-CSRF-Token");
        assert_eq!(
            config.list_url("/My Docs", SortKey::Modified, SortDirection::Desc),
            "/api/files?path=%2FMy%20Docs&sort=modified&dir=desc"
        );
        assert_eq!(config.logs_url(50, 100), "/api/logs?limit=50&offset=100");
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ApiConfig::with_base("https://files.example.com/api/");
        assert_eq!(config.endpoint("/settings"), "https://files.example.com/api/settings");
        assert_eq!(config.endpoint("settings"), "https://files.example.com/api/settings");
        assert_eq!(
            config.download_url("/a&b.txt"),
            "https://files.example.com/api/files/download?path=%2Fa%26b.txt"
        );
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let config = ApiConfig::from_json(r#"{"base_url":"/panel/api"}"#).expect("config");
        assert_eq!(config.metadata_url("/x"), "/panel/api/metadata?path=%2Fx");
        assert_eq!(config.csrf_path, DEFAULT_CSRF_PATH);
        assert!(ApiConfig::from_json("[1]").is_err());
    }
}
