// Configuration, logging and process bootstrap
pub mod config;
pub mod server;
pub mod telemetry;

// HTTP Server modules
pub mod handlers;
pub mod models;
pub mod routes;

// Tool registry, built-in tools and the transport used to reach them
pub mod tools;
pub mod transport;

// LLM abstraction layer and agent loop
pub mod llm;

// Report generation
pub mod report;
