//! Studio connection settings, read from the environment.
//!
//! Absence of configuration is a valid state: the gateway then degrades to
//! empty/default results instead of erroring, so local development works
//! without a backing project. Only a configured-but-unreachable backend is
//! treated as a failure.

use tracing::{debug, info, warn};

/// Fallback project id used when the environment carries no real project.
/// A config with this project id counts as *unconfigured*.
pub const MOCK_PROJECT_ID: &str = "mockProjectId";

/// Fallback dataset paired with [`MOCK_PROJECT_ID`].
pub const MOCK_DATASET: &str = "mockDataset";

const DEFAULT_API_VERSION: &str = "2024-07-15";

/// Connection settings for the headless CMS studio backing the app.
#[derive(Clone)]
pub struct StudioConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    token: Option<String>,
}

impl StudioConfig {
    /// Build from environment variables, falling back to the mock project
    /// when unset (e.g. build or CI environments without secrets).
    ///
    /// Variables: `SANITY_PROJECT_ID`, `SANITY_DATASET`,
    /// `SANITY_API_VERSION`, `SANITY_USE_CDN`, `SANITY_API_TOKEN`.
    pub fn from_env() -> Self {
        let project_id = match std::env::var("SANITY_PROJECT_ID") {
            Ok(id) if !id.trim().is_empty() => id,
            _ => {
                warn!("SANITY_PROJECT_ID is not set; content fetching is disabled");
                MOCK_PROJECT_ID.to_string()
            }
        };
        let dataset = match std::env::var("SANITY_DATASET") {
            Ok(ds) if !ds.trim().is_empty() => ds,
            _ => {
                warn!("SANITY_DATASET is not set; falling back to the mock dataset");
                MOCK_DATASET.to_string()
            }
        };
        let api_version =
            std::env::var("SANITY_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let use_cdn = std::env::var("SANITY_USE_CDN")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let token = std::env::var("SANITY_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            warn!("SANITY_API_TOKEN is not set; enquiry submissions will be simulated");
        }

        Self {
            project_id,
            dataset,
            api_version,
            use_cdn,
            token,
        }
    }

    /// Build explicit settings, mainly for tests and embedding callers.
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: false,
            token: None,
        }
    }

    /// An explicitly unconfigured config (mock project, no token).
    pub fn unconfigured() -> Self {
        Self::new(MOCK_PROJECT_ID, MOCK_DATASET)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether a real project is configured. An unconfigured gateway returns
    /// empty/default results rather than errors.
    pub fn is_configured(&self) -> bool {
        !self.project_id.trim().is_empty() && self.project_id != MOCK_PROJECT_ID
    }

    /// Token gating the write path. Absent token means enquiry submissions
    /// are simulated.
    pub fn write_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn trace_loaded(&self) {
        info!(
            project_id = %self.project_id,
            dataset = %self.dataset,
            api_version = %self.api_version,
            use_cdn = self.use_cdn,
            configured = self.is_configured(),
            write_enabled = self.token.is_some(),
            "Loaded studio config"
        );
        debug!(?self, "Studio config (full debug)");
    }
}

// Manual Debug so the token never reaches logs.
impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_project_counts_as_unconfigured() {
        assert!(!StudioConfig::unconfigured().is_configured());
        assert!(StudioConfig::new("abc123", "production").is_configured());
    }

    #[test]
    fn token_gates_the_write_path() {
        let config = StudioConfig::new("abc123", "production");
        assert!(config.write_token().is_none());
        let config = config.with_token("secret");
        assert_eq!(config.write_token(), Some("secret"));
    }

    #[test]
    fn debug_redacts_the_token() {
        let config = StudioConfig::new("abc123", "production").with_token("secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("redacted"));
    }
}
