//! Service bootstrap: build state from configuration and serve until Ctrl-C

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AgentServiceConfig, RegistryConfigError, ToolServerConfig};
use crate::handlers::{AgentState, ApiKey, ToolServerState};
use crate::llm::{
    create_provider, meta_tool_catalog, Agent, LlmError, LlmProvider, MetaToolExecutor,
};
use crate::report::{ReportService, SYSTEM_PROMPT};
use crate::routes::{agent_routes, tool_server_routes};
use crate::transport::{HttpToolTransport, LocalToolTransport, ToolTransport, TransportError};

/// Startup failures
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("tool registry: {0}")]
    Registry(#[from] RegistryConfigError),

    #[error("tool transport: {0}")]
    Transport(#[from] TransportError),

    #[error("LLM provider: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to bind: {0}")]
    Bind(#[from] std::io::Error),
}

/// Build the tool server state
pub fn tool_server_state(config: &ToolServerConfig) -> Result<ToolServerState, ServerError> {
    let registry = config.providers.build_registry()?;
    tracing::info!(tools = ?registry.ids(), "Tool registry ready");

    Ok(ToolServerState {
        registry: Arc::new(registry),
        api_key: ApiKey::new(config.api_key.clone()),
        server_name: config.server_name.clone(),
    })
}

/// Build the agent service state around an already constructed provider
pub fn agent_state(
    config: &AgentServiceConfig,
    provider: Arc<dyn LlmProvider>,
) -> Result<AgentState, ServerError> {
    let transport: Arc<dyn ToolTransport> = if config.local_tools {
        let registry = config.providers.build_registry()?;
        tracing::info!(tools = ?registry.ids(), "Using in-process tool registry");
        Arc::new(LocalToolTransport::new(Arc::new(registry)))
    } else {
        tracing::info!(base_url = %config.mcp_base_url, "Using remote tool server");
        Arc::new(HttpToolTransport::new(
            config.mcp_base_url.clone(),
            config.mcp_api_key.clone(),
        )?)
    };

    let executor = MetaToolExecutor::new(Arc::clone(&transport));
    let agent = Agent::new(
        provider,
        Arc::new(executor),
        meta_tool_catalog().to_vec(),
        config.generation_config(),
        Some(SYSTEM_PROMPT.to_string()),
    )
    .with_max_iterations(config.max_rounds)
    .with_parallel_tool_calls(config.parallel_tool_calls);

    Ok(AgentState {
        reports: ReportService::new(agent).with_default_country(config.default_country.clone()),
        transport,
    })
}

pub async fn run_tool_server(config: ToolServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(tool_server_state(&config)?);
    let routes = tool_server_routes(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, server_name = %config.server_name, "Tool server listening");

    warp::serve(routes)
        .incoming(listener)
        .graceful(shutdown_signal())
        .run()
        .await;
    tracing::info!("Tool server stopped");
    Ok(())
}

pub async fn run_agent_service(config: AgentServiceConfig) -> Result<(), ServerError> {
    let provider: Arc<dyn LlmProvider> = Arc::from(create_provider(config.openai_config())?);
    tracing::info!(model = provider.model_name(), base_url = %config.llm_base_url, "LLM provider ready");

    let state = Arc::new(agent_state(&config, provider)?);
    let routes = agent_routes(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Agent service listening");

    warp::serve(routes)
        .incoming(listener)
        .graceful(shutdown_signal())
        .run()
        .await;
    tracing::info!("Agent service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
