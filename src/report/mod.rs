//! Markdown country reports produced by the agent

pub mod prompt;

pub use prompt::{user_prompt, SYSTEM_PROMPT};

use crate::llm::{Agent, AgentError, AgentRun};

/// Query used when the caller supplies none
pub const DEFAULT_COUNTRY: &str = "france";

/// Runs the agent once per report request
pub struct ReportService {
    agent: Agent,
    default_country: String,
}

impl ReportService {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    pub fn model_name(&self) -> &str {
        self.agent.model_name()
    }

    /// Trimmed query, or the default when missing or blank
    pub fn resolve_query<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(self.default_country.as_str())
    }

    /// Generate a report, returning the full agent run
    pub async fn generate(&self, query: Option<&str>) -> Result<AgentRun, AgentError> {
        let country = self.resolve_query(query);
        tracing::info!(country, "Generating report");
        self.agent.run(user_prompt(country)).await
    }
}
