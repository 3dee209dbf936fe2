use clap::Parser;

use mcp_agent::config::{Cli, Command};
use mcp_agent::{server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    match cli.command {
        Command::Tools(config) => server::run_tool_server(config).await?,
        Command::Agent(config) => server::run_agent_service(config).await?,
    }

    Ok(())
}
