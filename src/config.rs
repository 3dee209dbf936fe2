//! Command-line and environment configuration
//!
//! Every option can be given as a flag or through the environment variable
//! named next to it; flags win. A `.env` file is loaded before parsing.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::llm::openai::{OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::llm::GenerationConfig;
use crate::tools::upstream::{DEFAULT_GEOCODING_URL, DEFAULT_RESTCOUNTRIES_URL};
use crate::tools::{builtin_providers, ProviderError, ToolRegistry, UpstreamClient, UpstreamError};

#[derive(Parser, Debug)]
#[command(name = "mcp-agent")]
#[command(about = "Schema-validated tool server and tool-calling report agent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the tool registry over HTTP
    Tools(ToolServerConfig),
    /// Serve Markdown reports generated by the tool-calling agent
    Agent(AgentServiceConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// One JSON object per line
    Json,
}

/// Tool providers and the data APIs behind them
#[derive(Args, Debug, Clone)]
pub struct ProviderConfig {
    /// Comma-separated tool providers, registered in this order
    #[arg(long, env = "MCP_TOOL_PROVIDERS", value_delimiter = ',', default_value = "country,weather")]
    pub tool_providers: Vec<String>,

    /// RestCountries API root
    #[arg(long, env = "RESTCOUNTRIES_BASE_URL", default_value = DEFAULT_RESTCOUNTRIES_URL)]
    pub restcountries_base_url: String,

    /// Open-Meteo geocoding API root
    #[arg(long, env = "GEOCODING_BASE_URL", default_value = DEFAULT_GEOCODING_URL)]
    pub geocoding_base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryConfigError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProviderConfig {
    /// Build the registry from the configured providers
    pub fn build_registry(&self) -> Result<ToolRegistry, RegistryConfigError> {
        let upstream = Arc::new(UpstreamClient::new(
            &self.restcountries_base_url,
            &self.geocoding_base_url,
        )?);
        let providers = builtin_providers(&self.tool_providers, upstream)?;
        Ok(ToolRegistry::from_providers(&providers))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ToolServerConfig {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Shared secret required on /tools/*
    #[arg(long, env = "MCP_API_KEY", default_value = "dev-key-123", hide_env_values = true)]
    pub api_key: String,

    /// Name reported by /health
    #[arg(long, env = "MCP_SERVER_NAME", default_value = "MCP Country Server")]
    pub server_name: String,

    #[command(flatten)]
    pub providers: ProviderConfig,
}

impl ToolServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Args, Debug, Clone)]
pub struct AgentServiceConfig {
    /// Address to bind to
    #[arg(long, env = "SERVICE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "SERVICE_PORT", default_value_t = 5050)]
    pub port: u16,

    /// Tool server root URL
    #[arg(long, env = "MCP_BASE_URL", default_value = "http://localhost:3001")]
    pub mcp_base_url: String,

    /// Shared secret sent to the tool server
    #[arg(long, env = "MCP_API_KEY", default_value = "dev-key-123", hide_env_values = true)]
    pub mcp_api_key: String,

    /// Serve tools from an in-process registry instead of a remote tool server
    #[arg(long)]
    pub local_tools: bool,

    /// Bearer token for the chat-completions API
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: String,

    /// Chat-completions API root
    #[arg(long, env = "LLM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub llm_base_url: String,

    /// Model identifier
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL)]
    pub llm_model: String,

    #[arg(long, env = "LLM_TEMPERATURE", default_value_t = 0.0)]
    pub llm_temperature: f32,

    #[arg(long, env = "LLM_MAX_TOKENS", default_value_t = 1500)]
    pub llm_max_tokens: u32,

    /// Overall timeout for one model call, in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS")]
    pub llm_timeout_secs: Option<u64>,

    /// Tool rounds allowed before a run fails
    #[arg(long, env = "AGENT_MAX_ROUNDS", default_value_t = 8)]
    pub max_rounds: usize,

    /// Execute the tool calls of one round concurrently
    #[arg(long, env = "AGENT_PARALLEL_TOOL_CALLS")]
    pub parallel_tool_calls: bool,

    /// Country used when a report request names none
    #[arg(long, env = "REPORT_DEFAULT_COUNTRY", default_value = "france")]
    pub default_country: String,

    #[command(flatten)]
    pub providers: ProviderConfig,
}

impl AgentServiceConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        let config = OpenAiConfig::new(&self.llm_api_key, &self.llm_model)
            .with_base_url(&self.llm_base_url);
        match self.llm_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::new(self.llm_max_tokens).with_temperature(self.llm_temperature)
    }
}
